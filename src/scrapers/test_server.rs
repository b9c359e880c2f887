//! Loopback HTTP server and fixture pages for scraper tests

use axum::{response::Html, routing::get, Router};

pub const STATS_2023: &str = r#"
<html><body>
<table id="basic_school_stats">
  <thead>
    <tr class="over_header">
      <th colspan="3"></th><th colspan="2">Overall</th><th></th><th colspan="2">Conf.</th>
      <th></th><th colspan="2">Home</th><th></th><th colspan="2">Away</th>
    </tr>
    <tr>
      <th>Rk</th><th>School</th><th>G</th><th>W</th><th>L</th><th></th><th>W</th><th>L</th>
      <th></th><th>W</th><th>L</th><th></th><th>W</th><th>L</th><th>SRS</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <th>1</th><td>Duke</td><td>30</td><td>20</td><td>10</td><td></td><td>12</td><td>8</td>
      <td></td><td>14</td><td>2</td><td></td><td>4</td><td>6</td><td>15.2</td>
    </tr>
    <tr class="thead">
      <th>Rk</th><td>School</td><td>G</td><td>W</td><td>L</td><td></td><td>W</td><td>L</td>
      <td></td><td>W</td><td>L</td><td></td><td>W</td><td>L</td><td>SRS</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

/// Season roster page: school names sit in column 1
pub const ROSTER_2023: &str = r#"
<html><body>
<table>
  <thead>
    <tr class="over_header"><th colspan="2"></th><th colspan="2">Overall</th></tr>
    <tr><th>Rk</th><th>School</th><th>W</th><th>L</th></tr>
  </thead>
  <tbody>
    <tr><th>1</th><td>Duke&nbsp;NCAA</td><td>27</td><td>9</td></tr>
    <tr><th>2</th><td>NC State</td><td>22</td><td>14</td></tr>
    <tr class="thead"><th>Rk</th><td>School</td><td>W</td><td>L</td></tr>
    <tr><th>3</th><td>Omaha</td><td>9</td><td>23</td></tr>
  </tbody>
</table>
</body></html>
"#;

pub const DUKE_GAMELOG_2023: &str = r#"
<html><body>
<table id="team_game_log">
  <thead>
    <tr class="over_header">
      <th colspan="9"></th><th colspan="2">Team</th><th colspan="2">Opponent</th>
    </tr>
    <tr>
      <th>Rk</th><th>Gtm</th><th>Date</th><th></th><th>Opp</th><th>Type</th><th>Rslt</th>
      <th>Tm</th><th>Opp</th><th>OT</th><th>FG</th><th>FGA</th><th>FG</th><th>FGA</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <th>1</th><td>1</td><td>2022-11-07</td><td></td><td>Jacksonville</td><td>REG (Non-Conf)</td>
      <td>W</td><td>71</td><td>44</td><td></td><td>25</td><td>60</td><td>15</td><td>50</td>
    </tr>
    <tr>
      <th>2</th><td>2</td><td>2022-11-15</td><td>N</td><td>Kansas</td><td>REG (Non-Conf)</td>
      <td>L</td><td>64</td><td>69</td><td>OT</td><td>24</td><td>58</td><td>26</td><td>61</td>
    </tr>
    <tr class="thead">
      <th>Rk</th><td>Gtm</td><td>Date</td><td></td><td>Opp</td><td>Type</td><td>Rslt</td>
      <td>Tm</td><td>Opp</td><td>OT</td><td>FG</td><td>FGA</td><td>FG</td><td>FGA</td>
    </tr>
    <tr>
      <th>3</th><td>3</td><td>2023-01-04</td><td>@</td><td>Wake Forest</td><td>REG (Conf)</td>
      <td>L</td><td>70</td><td>81</td><td></td><td>27</td><td>59</td><td>30</td><td>60</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

pub const NO_TABLE: &str = "<html><body><p>Page not found (404 error)</p></body></html>";

/// Serve `(path, body)` pages on a loopback port and return the base URL.
/// Unknown paths answer 404.
pub async fn serve(pages: Vec<(&'static str, &'static str)>) -> String {
    let mut app = Router::new();
    for (path, body) in pages {
        app = app.route(path, get(move || async move { Html(body) }));
    }
    serve_router(app).await
}

pub async fn serve_router(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
