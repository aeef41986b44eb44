/// Indexed view over transcript lines with peek and seek, so a lookahead can
/// hand a boundary line back to the outer scan.
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    /// Index of the line the next call to `next` returns.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Move so that `next` returns line `pos` again. Clamped to the end.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.lines.len());
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }
}
