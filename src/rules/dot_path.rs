/// Split a dotted path, treating `\.` as a literal dot.
///
/// A `.` is a separator unless the character right before it is `\`. Each
/// segment then has its `\.` sequences replaced by `.`.
pub fn split_dot_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut previous = None;

    for (index, c) in path.char_indices() {
        if c == '.' && previous != Some('\\') {
            segments.push(&path[start..index]);
            start = index + c.len_utf8();
        }
        previous = Some(c);
    }
    segments.push(&path[start..]);

    segments
        .into_iter()
        .map(|segment| segment.replace("\\.", "."))
        .collect()
}
