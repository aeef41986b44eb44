/// Page colours for the HTML report. Diagram semantics (battery bands,
/// coverage outlines, edge colour) stay fixed across themes.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub page_background: &'static str,
    pub container_background: &'static str,
    pub foreground: &'static str,
    pub heading_color: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub panel_background: &'static str,
    pub canvas_background: &'static str,
    pub border: &'static str,
    pub row_stripe: &'static str,
    pub selected_row: &'static str,
    pub label_color: &'static str,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            page_background: "#f8f9fa",
            container_background: "#ffffff",
            foreground: "#212529",
            heading_color: "#2c3e50",
            muted: "#666666",
            accent: "#3498db",
            panel_background: "#f8f9fa",
            canvas_background: "#fafafa",
            border: "#dddddd",
            row_stripe: "#f8f9fa",
            selected_row: "#e8f5e8",
            label_color: "#333333",
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            page_background: "#1e1e1e",
            container_background: "#252526",
            foreground: "#c8c8c8",
            heading_color: "#ffffff",
            muted: "#9a9a9a",
            accent: "#5294e2",
            panel_background: "#2d2d2d",
            canvas_background: "#1b1b1b",
            border: "#3c3c3c",
            row_stripe: "#2a2a2a",
            selected_row: "#1f3a26",
            label_color: "#e0e0e0",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
