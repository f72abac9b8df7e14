//! Self-contained HTML dashboard.
//!
//! One file, no build step: plotly.js from the CDN, data embedded as JSON.
//! Top panel is a candlestick chart with buy/sell markers sized by
//! trade weight; bottom panel is the mark-to-market equity curve.

use crate::domain::Bar;
use crate::simulator::SimulationResult;
use crate::strategy::{SignalTable, SIGNAL_BUY, SIGNAL_SELL};
use serde_json::json;

/// Render the dashboard HTML for one backtest run.
pub fn render_dashboard(
    symbol: &str,
    bars: &[Bar],
    signals: &SignalTable,
    result: &SimulationResult,
) -> String {
    let dates: Vec<String> = bars.iter().map(|b| b.date.to_string()).collect();

    let candles = json!({
        "type": "candlestick",
        "name": symbol,
        "x": dates,
        "open": bars.iter().map(|b| b.open).collect::<Vec<_>>(),
        "high": bars.iter().map(|b| b.high).collect::<Vec<_>>(),
        "low": bars.iter().map(|b| b.low).collect::<Vec<_>>(),
        "close": bars.iter().map(|b| b.close).collect::<Vec<_>>(),
        "xaxis": "x",
        "yaxis": "y",
    });

    let buys = marker_trace(bars, signals, SIGNAL_BUY, "Buy", "triangle-up", "green");
    let sells = marker_trace(bars, signals, SIGNAL_SELL, "Sell", "triangle-down", "red");

    let equity = json!({
        "type": "scatter",
        "mode": "lines",
        "name": "Equity",
        "x": dates,
        "y": result.equity_curve,
        "line": {"color": "purple"},
        "xaxis": "x2",
        "yaxis": "y2",
    });

    let traces = json!([candles, buys, sells, equity]);
    let metrics = &result.metrics;
    let total_return = if metrics.initial_balance > 0.0 {
        metrics.final_balance / metrics.initial_balance - 1.0
    } else {
        0.0
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{symbol} backtest</title>
<script src="https://cdn.plot.ly/plotly-2.32.0.min.js"></script>
<style>
  body {{ font-family: sans-serif; margin: 1rem 2rem; }}
  .metrics span {{ margin-right: 2rem; }}
</style>
</head>
<body>
<h1>{symbol} backtest</h1>
<div class="metrics">
  <span>Initial: ${initial:.2}</span>
  <span>Final: ${final_balance:.2}</span>
  <span>Return: {total_return_pct:.1}%</span>
  <span>Trades: {trades}</span>
  <span>Win rate: {win_rate_pct:.1}%</span>
  <span>Max drawdown: {max_dd_pct:.1}%</span>
</div>
<div id="chart" style="height: 800px;"></div>
<script>
var traces = {traces};
var layout = {{
  grid: {{rows: 2, columns: 1, roworder: "top to bottom"}},
  xaxis: {{rangeslider: {{visible: false}}}},
  yaxis: {{title: "Price", domain: [0.35, 1.0]}},
  yaxis2: {{title: "Equity", domain: [0.0, 0.28]}},
  showlegend: true
}};
Plotly.newPlot("chart", traces, layout);
</script>
</body>
</html>
"#,
        symbol = symbol,
        traces = traces,
        initial = metrics.initial_balance,
        final_balance = metrics.final_balance,
        total_return_pct = total_return * 100.0,
        trades = metrics.total_trades,
        win_rate_pct = metrics.win_rate * 100.0,
        max_dd_pct = metrics.max_drawdown * 100.0,
    )
}

/// Scatter trace of signal markers, sized by |trade_weight|.
fn marker_trace(
    bars: &[Bar],
    signals: &SignalTable,
    which: i32,
    name: &str,
    shape: &str,
    color: &str,
) -> serde_json::Value {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut sizes = Vec::new();
    let mut weights = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        if signals.signal[i] != which {
            continue;
        }
        x.push(bar.date.to_string());
        // Below the low for entries, above the high for exits.
        y.push(if which == SIGNAL_BUY {
            bar.low * 0.99
        } else {
            bar.high * 1.01
        });
        let weight = signals.trade_weight[i].abs();
        sizes.push((weight * 50.0).max(6.0));
        weights.push(weight);
    }

    json!({
        "type": "scatter",
        "mode": "markers",
        "name": name,
        "x": x,
        "y": y,
        "marker": {"symbol": shape, "size": sizes, "color": color},
        "text": weights,
        "hovertemplate": "Date: %{x}<br>Price: %{y}<br>Weight: %{text:.3f}<br>",
        "xaxis": "x",
        "yaxis": "y",
    })
}
