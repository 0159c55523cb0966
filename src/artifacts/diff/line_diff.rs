use derive_new::new;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

impl<T> Edit<T> {
    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value } | Edit::Insert { value } | Edit::Equal { value } => value,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            Edit::Delete { .. } => "- ",
            Edit::Insert { .. } => "+ ",
            Edit::Equal { .. } => "  ",
        }
    }
}

impl<T> Display for Edit<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.marker(), self.value())
    }
}

/// Greedy single-pass line comparator
///
/// Two cursors advance in lockstep. Equal lines under both cursors are
/// context; otherwise the old line (if any) is a deletion and the new line
/// (if any) an insertion, both in the same step. The cursors only
/// resynchronize when they happen to land on equal lines, so an insertion
/// near the top shows every following line as a delete/insert pair.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct GreedyDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T: Eq + Clone> GreedyDiff<'_, T> {
    pub fn diff(&self) -> Vec<Edit<T>> {
        let (n, m) = (self.a.len(), self.b.len());
        let (mut i, mut j) = (0, 0);
        let mut edits = Vec::with_capacity(n.max(m));

        while i < n || j < m {
            if i < n && j < m && self.a[i] == self.b[j] {
                edits.push(Edit::Equal {
                    value: self.a[i].clone(),
                });
                i += 1;
                j += 1;
                continue;
            }

            if i < n {
                edits.push(Edit::Delete {
                    value: self.a[i].clone(),
                });
                i += 1;
            }
            if j < m {
                edits.push(Edit::Insert {
                    value: self.b[j].clone(),
                });
                j += 1;
            }
        }

        edits
    }
}

/// Split text into lines on `\n`; a trailing newline does not start an
/// extra empty line
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_terminator('\n').map(str::to_string).collect()
}

pub fn diff_lines(old_text: &str, new_text: &str) -> Vec<Edit<String>> {
    let (old_lines, new_lines) = (split_lines(old_text), split_lines(new_text));
    GreedyDiff::new(&old_lines, &new_lines).diff()
}
