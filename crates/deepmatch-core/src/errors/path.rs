use std::fmt;

use serde::Serialize;

/// One step of descent from the root value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum Segment {
    Index(usize),
    /// Map key, pre-rendered.
    Key(String),
    Field(String),
    /// Pointer dereference, rendered as a `*` prefix.
    Deref,
    /// Passage through a transforming matcher such as `Smuggle`.
    Call(String),
}

/// Location of a value inside the compared tree, e.g. `*DATA.Next[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    root: String,
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn push(&self, seg: Segment) -> Self {
        let mut next = self.clone();
        next.segments.push(seg);
        next
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = self.root.clone();
        for seg in &self.segments {
            match seg {
                Segment::Index(i) => out.push_str(&format!("[{i}]")),
                Segment::Key(k) => out.push_str(&format!("[{k}]")),
                Segment::Field(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                Segment::Deref => out.insert(0, '*'),
                Segment::Call(name) => out = format!("{name}({out})"),
            }
        }
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_rendering() {
        let p = Path::new("DATA")
            .push(Segment::Field("Items".into()))
            .push(Segment::Index(2))
            .push(Segment::Key("\"k\"".into()));
        assert_eq!(p.to_string(), "DATA.Items[2][\"k\"]");

        let p = Path::new("DATA")
            .push(Segment::Deref)
            .push(Segment::Field("Next".into()));
        assert_eq!(p.to_string(), "*DATA.Next");

        let p = Path::new("DATA").push(Segment::Call("Smuggle".into()));
        assert_eq!(p.to_string(), "Smuggle(DATA)");
        assert_eq!(p.depth(), 1);
    }
}
