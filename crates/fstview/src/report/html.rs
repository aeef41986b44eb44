use std::fmt;

use crate::geometry::BatteryBand;
use crate::model::CandidateTree;
use crate::theme::Theme;

use super::ReportModel;
use super::svg::Diagram;

const TITLE: &str = "GeoSteiner Network Optimization - Budget-Constrained Solution";
const SELECTED_ID_CELL: &str = "background: #28a745; color: white; font-weight: bold;";
const NOT_AVAILABLE: &str = "Not available";

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Whole-number cost with thousands separators, e.g. `1,495,410`.
pub fn format_cost(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn terminal_list(ids: &[usize]) -> String {
    ids.iter()
        .map(|t| format!("T{t}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn stylesheet(theme: &Theme) -> String {
    format!(
        r#"body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; background: {page}; color: {fg}; }}
.container {{ max-width: 1400px; margin: 0 auto; background: {container}; border-radius: 10px; padding: 20px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }}
h1 {{ color: {heading}; text-align: center; margin-bottom: 5px; }}
h3 {{ color: {heading}; margin-top: 0; }}
.subtitle {{ text-align: center; color: {muted}; margin-top: 0; }}
.network-container {{ display: flex; gap: 20px; margin: 20px 0; }}
.network-svg {{ border: 2px solid {border}; border-radius: 8px; background: {canvas}; }}
.sidebar {{ flex: 1; min-width: 300px; }}
.metrics, .legend, .fst-details, .section {{ background: {panel}; border-radius: 8px; padding: 15px; margin-bottom: 15px; }}
.metric-row {{ display: flex; justify-content: space-between; padding: 4px 0; border-bottom: 1px solid {border}; }}
.metric-label {{ color: {muted}; }}
.metric-value {{ font-weight: bold; }}
.legend-item {{ display: flex; align-items: center; gap: 10px; margin: 6px 0; }}
.legend-symbol {{ width: 20px; height: 20px; }}
.covered-terminal {{ fill: #00ff00; stroke: #333; stroke-width: 2; }}
.uncovered-terminal {{ fill: #ffffff; stroke: #999; stroke-width: 3; stroke-dasharray: 5,3; }}
.selected-fst {{ stroke: #007bff; stroke-width: 4; }}
.steiner-point {{ fill: #6c757d; }}
.terminal-label {{ font-size: 12px; font-weight: bold; }}
.battery-text {{ font-size: 10px; }}
.constraint-check {{ padding: 6px 0; }}
.tech-details h4 {{ margin: 10px 0 4px; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ padding: 8px; text-align: left; border-bottom: 1px solid {border}; }}
th {{ background: {accent}; color: white; }}
"#,
        page = theme.page_background,
        fg = theme.foreground,
        container = theme.container_background,
        heading = theme.heading_color,
        muted = theme.muted,
        border = theme.border,
        canvas = theme.canvas_background,
        panel = theme.panel_background,
        accent = theme.accent,
    )
}

/// The complete, self-contained HTML report.
pub struct HtmlReport<'a> {
    model: &'a ReportModel,
    theme: &'a Theme,
}

impl<'a> HtmlReport<'a> {
    pub fn new(model: &'a ReportModel, theme: &'a Theme) -> Self {
        Self { model, theme }
    }

    fn metric_row(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
        writeln!(
            f,
            r#"<div class="metric-row"><span class="metric-label">{}</span><span class="metric-value">{}</span></div>"#,
            escape_html(label),
            escape_html(value)
        )
    }

    fn write_metrics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.model;
        let total_cost = m.total_cost();
        writeln!(f, r#"<div class="metrics">"#)?;
        writeln!(f, "<h3>Solution Metrics</h3>")?;
        Self::metric_row(
            f,
            "Selected FSTs",
            &format!("{} of {}", m.topology.selected_count(), m.topology.trees.len()),
        )?;
        Self::metric_row(f, "Total Terminals", &m.terminals.len().to_string())?;
        Self::metric_row(f, "Covered", &m.covered_count().to_string())?;
        Self::metric_row(f, "Uncovered", &m.uncovered_ids().len().to_string())?;
        Self::metric_row(f, "Coverage Rate", &format!("{:.1}%", m.coverage_rate()))?;
        Self::metric_row(
            f,
            "Total Cost",
            &total_cost.map_or_else(|| NOT_AVAILABLE.to_string(), format_cost),
        )?;
        Self::metric_row(
            f,
            "Budget",
            &m.budget.map_or_else(|| NOT_AVAILABLE.to_string(), format_cost),
        )?;
        Self::metric_row(
            f,
            "Budget Utilization",
            &m.budget_utilization()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |u| format!("{u:.1}%")),
        )?;
        Self::metric_row(f, "MIP Gap", &m.gap.to_string())?;
        writeln!(f, "</div>")
    }

    fn write_legend(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<div class="legend">"#)?;
        writeln!(f, "<h3>Legend</h3>")?;
        let symbols = [
            (
                r#"<circle cx="10" cy="10" r="7" class="covered-terminal"/>"#,
                "Covered terminal",
            ),
            (
                r#"<circle cx="10" cy="10" r="7" class="uncovered-terminal"/>"#,
                "Uncovered terminal",
            ),
            (
                r#"<circle cx="10" cy="10" r="5" class="steiner-point"/>"#,
                "Steiner point",
            ),
            (
                r#"<line x1="2" y1="10" x2="18" y2="10" class="selected-fst"/>"#,
                "Selected FST edge",
            ),
        ];
        for (symbol, label) in symbols {
            writeln!(
                f,
                r#"<div class="legend-item"><svg class="legend-symbol" viewBox="0 0 20 20">{symbol}</svg><span>{label}</span></div>"#
            )?;
        }
        writeln!(f, "<h4>Battery level</h4>")?;
        for band in BatteryBand::all() {
            writeln!(
                f,
                r#"<div class="legend-item"><svg class="legend-symbol" viewBox="0 0 20 20"><circle cx="10" cy="10" r="7" fill="{}"/></svg><span>{}</span></div>"#,
                band.color(),
                band.label()
            )?;
        }
        writeln!(f, "</div>")
    }

    fn write_inputs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs = &self.model.inputs;
        writeln!(f, r#"<div class="section">"#)?;
        writeln!(f, "<h3>Input Files</h3>")?;
        writeln!(f, "<table>")?;
        for (label, path) in [
            ("Terminals", &inputs.terminals),
            ("FSTs", &inputs.fsts),
            ("FST dump", &inputs.dump),
            ("Solution", &inputs.solution),
        ] {
            writeln!(
                f,
                "<tr><td>{label}</td><td><code>{}</code></td></tr>",
                escape_html(&path.display().to_string())
            )?;
        }
        writeln!(f, "</table>")?;
        writeln!(f, "</div>")
    }

    fn check(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
        writeln!(
            f,
            r#"<div class="constraint-check">{}</div>"#,
            escape_html(text)
        )
    }

    fn write_constraints(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.model;
        writeln!(f, r#"<div class="section">"#)?;
        writeln!(f, "<h3>Constraint Verification</h3>")?;

        let total = m.terminals.len();
        let uncovered = m.uncovered_ids();
        if uncovered.is_empty() {
            Self::check(f, &format!("✅ Coverage: all {total} terminals covered"))?;
        } else {
            Self::check(
                f,
                &format!(
                    "⚠️ Coverage: {} out of {total} terminals covered (uncovered: {})",
                    m.covered_count(),
                    terminal_list(&uncovered)
                ),
            )?;
        }

        match (m.total_cost(), m.budget, m.within_budget()) {
            (Some(cost), Some(budget), Some(true)) => Self::check(
                f,
                &format!(
                    "✅ Budget: total cost {} within budget {}",
                    format_cost(cost),
                    format_cost(budget)
                ),
            )?,
            (Some(cost), Some(budget), Some(false)) => Self::check(
                f,
                &format!(
                    "❌ Budget: total cost {} exceeds budget {}",
                    format_cost(cost),
                    format_cost(budget)
                ),
            )?,
            _ => Self::check(f, &format!("Budget check: {NOT_AVAILABLE}"))?,
        }

        let (lhs, target) = (m.spanning_sum(), m.spanning_target());
        if lhs == target {
            Self::check(
                f,
                &format!("✅ Spanning: Σ(|FST|-1)×x + Σnot_covered = {lhs}"),
            )?;
        } else {
            Self::check(
                f,
                &format!("⚠️ Spanning: Σ(|FST|-1)×x + Σnot_covered = {lhs}, expected {target}"),
            )?;
        }

        if m.topology.realizations.is_empty() {
            Self::check(f, "Connectivity: no FSTs selected")?;
        } else {
            let components = m.component_count();
            if components <= 1 {
                Self::check(f, "✅ Connectivity: selected FSTs form one connected network")?;
            } else {
                Self::check(
                    f,
                    &format!("⚠️ Connectivity: selected FSTs form {components} separate components"),
                )?;
            }
        }

        for anomaly in &m.topology.anomalies {
            Self::check(f, &format!("⚠️ {anomaly}"))?;
        }
        writeln!(f, "</div>")
    }

    fn write_formulation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let budget = self.model.budget.map_or_else(|| "B".to_string(), format_cost);
        writeln!(f, r#"<div class="section tech-details">"#)?;
        writeln!(f, "<h3>Technical Implementation Details</h3>")?;
        writeln!(f, "<h4>Objective Function</h4>")?;
        writeln!(
            f,
            "<p><strong>Minimize:</strong> Σ(tree_cost[i] + α×battery_cost[i])×x[i] + β×Σnot_covered[j]</p>"
        )?;
        writeln!(f, "<h4>Constraint Formulation</h4>")?;
        writeln!(f, "<ul>")?;
        writeln!(
            f,
            "<li><strong>Budget:</strong> Σ tree_cost[i] × x[i] ≤ {}</li>",
            escape_html(&budget)
        )?;
        writeln!(
            f,
            "<li><strong>Modified spanning:</strong> Σ(|FST[i]| - 1) × x[i] + Σnot_covered[j] = {}</li>",
            self.model.spanning_target()
        )?;
        writeln!(
            f,
            "<li><strong>Soft cutset 1:</strong> not_covered[j] ≤ 1 - x[i] ∀(i,j) where FST i contains terminal j</li>"
        )?;
        writeln!(
            f,
            "<li><strong>Soft cutset 2:</strong> Σᵢ x[i] ≤ n·(1 - not_covered[j]) ∀j, where n = |{{FSTs covering terminal j}}|</li>"
        )?;
        writeln!(
            f,
            "<li><strong>Domains:</strong> x[i] ∈ {{0,1}}, not_covered[j] ∈ [0,1]</li>"
        )?;
        writeln!(f, "</ul>")?;
        writeln!(f, "</div>")
    }

    fn write_tree_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
        tree: &CandidateTree,
    ) -> fmt::Result {
        let (row_style, id_style) = if tree.selected {
            (
                format!("background: {};", self.theme.selected_row),
                SELECTED_ID_CELL.to_string(),
            )
        } else {
            let stripe = if index % 2 == 0 {
                self.theme.container_background
            } else {
                self.theme.row_stripe
            };
            (format!("background: {stripe};"), String::new())
        };
        let cost = tree
            .cost
            .reported()
            .map_or_else(|| "n/a".to_string(), format_cost);
        writeln!(
            f,
            r#"<tr style="{row_style}"><td style="{id_style}">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            tree.id,
            terminal_list(&tree.terminals),
            tree.steiner_count,
            tree.kind_label(),
            cost,
            if tree.selected { "Selected" } else { "" }
        )
    }

    fn write_tree_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<div class="fst-details">"#)?;
        writeln!(f, "<h3>Selected FST Details</h3>")?;
        writeln!(f, "<table>")?;
        writeln!(
            f,
            "<tr><th>FST ID</th><th>Terminals</th><th>Steiner Points</th><th>Type</th><th>Cost</th><th>Status</th></tr>"
        )?;
        for (index, tree) in self.model.topology.trees.iter().enumerate() {
            self.write_tree_row(f, index, tree)?;
        }
        writeln!(f, "</table>")?;
        writeln!(f, "</div>")
    }
}

impl fmt::Display for HtmlReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, r#"<html lang="en">"#)?;
        writeln!(f, "<head>")?;
        writeln!(f, r#"<meta charset="UTF-8">"#)?;
        writeln!(f, "<title>{TITLE}</title>")?;
        writeln!(f, "<style>\n{}</style>", stylesheet(self.theme))?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, r#"<div class="container">"#)?;
        writeln!(f, "<h1>GeoSteiner Network Optimization</h1>")?;
        writeln!(f, r#"<p class="subtitle">Budget-Constrained Solution</p>"#)?;

        writeln!(f, r#"<div class="network-container">"#)?;
        writeln!(f, "<div>")?;
        writeln!(f, "{}", Diagram::new(self.model, self.theme.label_color))?;
        writeln!(f, "</div>")?;
        writeln!(f, r#"<div class="sidebar">"#)?;
        self.write_metrics(f)?;
        self.write_legend(f)?;
        self.write_inputs(f)?;
        writeln!(f, "</div>")?;
        writeln!(f, "</div>")?;

        self.write_constraints(f)?;
        self.write_tree_table(f)?;
        self.write_formulation(f)?;

        writeln!(f, "</div>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptimalityGap, TreeCost};
    use crate::reconcile::Anomaly;
    use crate::report::test_support::three_terminal_model;
    use std::path::PathBuf;

    fn render(model: &ReportModel) -> String {
        HtmlReport::new(model, &Theme::light()).to_string()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0), "0");
        assert_eq!(format_cost(999.4), "999");
        assert_eq!(format_cost(1_000.0), "1,000");
        assert_eq!(format_cost(1_495_410.2), "1,495,410");
        assert_eq!(format_cost(-12_345.0), "-12,345");
    }

    #[test]
    fn test_unavailable_gap_and_costs_are_explicit() {
        let html = render(&three_terminal_model());
        assert!(html.contains(
            r#"<span class="metric-label">MIP Gap</span><span class="metric-value">Not available</span>"#
        ));
        assert!(html.contains(
            r#"<span class="metric-label">Total Cost</span><span class="metric-value">Not available</span>"#
        ));
        assert!(html.contains("Budget check: Not available"));
        // Placeholder costs never leak into the document.
        assert!(!html.contains("100,000"));
    }

    #[test]
    fn test_metrics_panel() {
        let mut model = three_terminal_model();
        model.terminals[1].covered = false;
        model.gap = OptimalityGap::Available(0.1);
        model.budget = Some(2_000_000.0);
        model.topology.trees[0].cost = TreeCost::Reported(1_495_410.0);
        let html = render(&model);

        assert!(html.contains(r#"<span class="metric-value">1 of 1</span>"#));
        assert!(html.contains(r#"<span class="metric-value">66.7%</span>"#));
        assert!(html.contains(r#"<span class="metric-value">1,495,410</span>"#));
        assert!(html.contains(r#"<span class="metric-value">74.8%</span>"#));
        assert!(html.contains(r#"<span class="metric-value">10.0000% (0.100000)</span>"#));
        assert!(html.contains("2 out of 3 terminals covered (uncovered: T1)"));
        assert!(html.contains("✅ Budget: total cost 1,495,410 within budget 2,000,000"));
    }

    #[test]
    fn test_budget_exceeded() {
        let mut model = three_terminal_model();
        model.budget = Some(1_000.0);
        model.topology.trees[0].cost = TreeCost::Reported(1_500.0);
        let html = render(&model);
        assert!(html.contains("❌ Budget: total cost 1,500 exceeds budget 1,000"));
    }

    #[test]
    fn test_no_terminals_rate_is_zero() {
        let html = render(&ReportModel::default());
        assert!(html.contains(
            r#"<span class="metric-label">Coverage Rate</span><span class="metric-value">0.0%</span>"#
        ));
        assert!(html.contains("Connectivity: no FSTs selected"));
    }

    #[test]
    fn test_tree_table_highlights_selected_rows() {
        let mut model = three_terminal_model();
        model.topology.trees.push(CandidateTree {
            id: 1,
            terminals: vec![0, 1],
            steiner_count: 0,
            steiner_point: None,
            selected: false,
            cost: TreeCost::placeholder_for(1),
        });
        let html = render(&model);
        assert!(html.contains(
            r#"<tr style="background: #e8f5e8;"><td style="background: #28a745; color: white; font-weight: bold;">0</td><td>T0, T1, T2</td><td>1</td><td>Y-junction</td>"#
        ));
        assert!(html.contains(
            r#"<tr style="background: #f8f9fa;"><td style="">1</td><td>T0, T1</td><td>0</td><td>Direct</td>"#
        ));
    }

    #[test]
    fn test_document_structure() {
        let html = render(&three_terminal_model());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(&format!("<title>{TITLE}</title>")));
        assert!(html.contains(r#"width="800" height="600""#));
        for section in [
            "Solution Metrics",
            "Legend",
            "Battery level",
            "Input Files",
            "Constraint Verification",
            "Selected FST Details",
            "Technical Implementation Details",
        ] {
            assert!(html.contains(section), "missing section {section}");
        }
        for band in BatteryBand::all() {
            assert!(html.contains(band.label()));
        }
        assert!(html.contains("✅ Connectivity: selected FSTs form one connected network"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut model = three_terminal_model();
        model.inputs.solution = PathBuf::from("runs/<b>&solution.txt");
        model
            .topology
            .anomalies
            .push(Anomaly::UnknownSelectedTree { tree_id: 9 });
        let html = render(&model);
        assert!(html.contains("runs/&lt;b&gt;&amp;solution.txt"));
        assert!(!html.contains("<b>&solution"));
        assert!(html.contains("⚠️ selected FST 9 has no entry in the dump"));
    }

    #[test]
    fn test_spanning_check() {
        let mut model = three_terminal_model();
        let html = render(&model);
        assert!(html.contains("✅ Spanning: Σ(|FST|-1)×x + Σnot_covered = 2"));

        model.terminals[1].covered = false;
        let html = render(&model);
        assert!(html.contains("⚠️ Spanning: Σ(|FST|-1)×x + Σnot_covered = 3, expected 2"));
    }

    #[test]
    fn test_formulation_section() {
        let mut model = three_terminal_model();
        let html = render(&model);
        assert!(html.contains("Technical Implementation Details"));
        assert!(html.contains("Σ tree_cost[i] × x[i] ≤ B</li>"));
        assert!(html.contains("Σ(|FST[i]| - 1) × x[i] + Σnot_covered[j] = 2</li>"));
        assert!(html.contains("n = |{FSTs covering terminal j}|"));
        assert!(html.contains("x[i] ∈ {0,1}"));

        model.budget = Some(1_500_000.0);
        let html = render(&model);
        assert!(html.contains("Σ tree_cost[i] × x[i] ≤ 1,500,000</li>"));
        // The formulation closes the document.
        let tail = &html[html.find("Selected FST Details").unwrap()..];
        assert!(tail.contains("Technical Implementation Details"));
    }

    #[test]
    fn test_dark_theme_colours_page() {
        let html = HtmlReport::new(&three_terminal_model(), &Theme::dark()).to_string();
        assert!(html.contains("background: #1e1e1e;"));
        assert!(html.contains(r#"<tr style="background: #1f3a26;">"#));
    }
}
