//! TradingView widget markup
//!
//! Produces the HTML page piped to capture-website. Nothing here is validated:
//! bad symbols just produce a page the renderer can't draw.

use crate::models::RenderRequest;

/// Compact overview widget for one symbol.
///
/// `time_range` is appended to the symbol verbatim, so it should already carry
/// the widget separator (`AAPL` + `|1M`).
pub fn overview_widget(symbol: &str, description: &str, time_range: &str) -> String {
    format!(
        r##"
<!-- TradingView Widget BEGIN -->
<div class="tradingview-widget-container">
  <div id="tradingview_9efce"></div>
  <div class="tradingview-widget-copyright">Chart for discussion only, data provided by TradingView</div>
  <script type="text/javascript" src="https://s3.tradingview.com/tv.js"></script>
  <script type="text/javascript">
  new TradingView.MediumWidget(
  {{
  "symbols": [
    [
      "{description}",
      "{symbol}{time_range}"
    ]
  ],
  "chartOnly": false,
  "width": 1000,
  "height": 400,
  "locale": "en",
  "colorTheme": "dark",
  "gridLineColor": "#2A2E39",
  "trendLineColor": "#1976D2",
  "fontColor": "#787B86",
  "underLineColor": "rgba(55, 166, 239, 0.15)",
  "isTransparent": false,
  "autosize": false,
  "container_id": "tradingview_9efce"
}}
  );
  </script>
</div>
<!-- TradingView Widget END -->
"##
    )
}

/// Full single-symbol chart with a simple moving average study.
///
/// The first character of `time_range` (the widget separator) is dropped.
pub fn detail_widget(symbol: &str, time_range: &str) -> String {
    let range = strip_range_separator(time_range);
    format!(
        r##"
<!-- TradingView Widget BEGIN -->
<div class="tradingview-widget-container">
  <div id="tradingview_f9dfa"></div>
  <div class="tradingview-widget-copyright">Chart for discussion only, data provided by TradingView</div>
  <script type="text/javascript" src="https://s3.tradingview.com/tv.js"></script>
  <script type="text/javascript">
  new TradingView.widget(
  {{
  "width": 1000,
  "height": 400,
  "symbol": "{symbol}",
  "timezone": "America/New_York",
  "theme": "dark",
  "style": "1",
  "locale": "en",
  "toolbar_bg": "#f1f3f6",
  "enable_publishing": false,
  "hide_top_toolbar": true,
  "range": "{range}",
  "allow_symbol_change": true,
  "save_image": false,
  "studies": [
    "MASimple@tv-basicstudies"
  ],
  "container_id": "tradingview_f9dfa"
}}
  );
  </script>
</div>
<!-- TradingView Widget END -->
"##
    )
}

/// Pick the widget variant from the request's technical-analysis flag
pub fn build_markup(request: &RenderRequest) -> String {
    if request.technical_analysis {
        detail_widget(&request.symbol, &request.time_range)
    } else {
        overview_widget(&request.symbol, &request.description, &request.time_range)
    }
}

fn strip_range_separator(time_range: &str) -> &str {
    let mut chars = time_range.chars();
    chars.next();
    chars.as_str()
}
