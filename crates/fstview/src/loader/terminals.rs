use std::path::Path;

use crate::error::{Result, read_input};
use crate::geometry::Point;
use crate::model::Terminal;

/// Load `x y battery` triples in file order.
///
/// Reading stops at the first short or malformed triple; everything before it
/// is kept. Only an unreadable file is an error.
pub fn load_terminals(path: &Path) -> Result<Vec<Terminal>> {
    let content = read_input(path)?;
    let terminals = parse_terminals(&content);
    log::debug!(
        "Loaded {} terminal(s) from {}",
        terminals.len(),
        path.display()
    );
    Ok(terminals)
}

pub fn parse_terminals(content: &str) -> Vec<Terminal> {
    let mut terminals = Vec::new();
    let mut tokens = content.split_whitespace();

    loop {
        let (Some(x), Some(y), Some(battery)) = (
            tokens.next().and_then(|t| t.parse::<f64>().ok()),
            tokens.next().and_then(|t| t.parse::<f64>().ok()),
            tokens.next().and_then(|t| t.parse::<f64>().ok()),
        ) else {
            break;
        };

        terminals.push(Terminal {
            id: terminals.len(),
            position: Point::new(x, y),
            battery,
            covered: true,
        });
    }

    terminals
}
