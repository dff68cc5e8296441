/// Milliseconds between client-side refetches of `/plot`.
pub const REFRESH_INTERVAL_MS: u64 = 5000;

/// The landing page: one image plus a timer that refetches it with a
/// cache-busting query string. Polling is driven entirely by the browser.
pub fn index_html() -> String {
    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Metrics Visualization</title>
    <style>
      body {{ font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }}
      .container {{ max-width: 1200px; margin: 0 auto; text-align: center; }}
      h1 {{ color: #333; }}
      .plot {{ background: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); margin-top: 20px; }}
      img {{ max-width: 100%; height: auto; }}
    </style>
    <script>
      function refreshPlot() {{
        const img = document.getElementById('plot');
        img.src = '/plot?' + new Date().getTime();
      }}
      setInterval(refreshPlot, {interval});
    </script>
  </head>
  <body>
    <div class="container">
      <h1>Files Processed per Second</h1>
      <div class="plot">
        <img id="plot" src="/plot" alt="Throughput plot">
      </div>
    </div>
  </body>
</html>
"#,
        interval = REFRESH_INTERVAL_MS
    )
}
