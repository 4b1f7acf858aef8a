use foundation::{Time, TimeSpan};

/// A deterministic interval tree over record positions.
///
/// Ordering contract:
/// - `query_at_time` returns positions in ascending order.
#[derive(Debug, Clone, Default)]
pub struct TemporalIndex {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
struct Node {
    center: i64,
    items: Vec<IntervalItem>,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IntervalItem {
    pub position: usize,
    pub span: TimeSpan,
}

impl TemporalIndex {
    pub fn build(items: Vec<IntervalItem>) -> Self {
        let mut nodes = Vec::new();
        if !items.is_empty() {
            let _ = build_node(&mut nodes, items);
        }
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Positions whose span contains `time` (inclusive).
    pub fn query_at_time(&self, time: Time) -> Vec<usize> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        query_time(&self.nodes, 0, time, &mut hits);

        hits.sort_unstable();
        hits.dedup();
        hits
    }
}

fn build_node(nodes: &mut Vec<Node>, items: Vec<IntervalItem>) -> usize {
    let center = choose_center(&items);

    let mut left_items = Vec::new();
    let mut right_items = Vec::new();
    let mut here = Vec::new();

    for item in items {
        if item.span.end.millis() < center {
            left_items.push(item);
        } else if item.span.start.millis() > center {
            right_items.push(item);
        } else {
            here.push(item);
        }
    }

    here.sort_by_key(|i| (i.span.start, i.span.end, i.position));

    let idx = nodes.len();
    nodes.push(Node {
        center,
        items: here,
        left: None,
        right: None,
    });

    if !left_items.is_empty() {
        let child = build_node(nodes, left_items);
        nodes[idx].left = Some(child);
    }
    if !right_items.is_empty() {
        let child = build_node(nodes, right_items);
        nodes[idx].right = Some(child);
    }

    idx
}

fn choose_center(items: &[IntervalItem]) -> i64 {
    let mut endpoints: Vec<i64> = Vec::with_capacity(items.len() * 2);
    for item in items {
        endpoints.push(item.span.start.millis());
        endpoints.push(item.span.end.millis());
    }
    endpoints.sort_unstable();
    endpoints[endpoints.len() / 2]
}

fn query_time(nodes: &[Node], idx: usize, t: Time, out: &mut Vec<usize>) {
    let node = &nodes[idx];

    for item in &node.items {
        if item.span.contains(t) {
            out.push(item.position);
        }
    }

    if t.millis() < node.center {
        if let Some(left) = node.left {
            query_time(nodes, left, t, out);
        }
    } else if let Some(right) = node.right {
        query_time(nodes, right, t, out);
    }
}

#[cfg(test)]
mod tests {
    use super::{IntervalItem, TemporalIndex};
    use foundation::{Time, TimeSpan};

    fn item(position: usize, a: i64, b: i64) -> IntervalItem {
        IntervalItem {
            position,
            span: TimeSpan::new(Time(a), Time(b)),
        }
    }

    #[test]
    fn query_at_time_returns_sorted_positions() {
        let idx = TemporalIndex::build(vec![
            item(3, 0, 10),
            item(1, 5, 15),
            item(2, 20, 30),
            item(0, 9, 9),
        ]);
        assert_eq!(idx.query_at_time(Time(9)), vec![0, 1, 3]);
        assert_eq!(idx.query_at_time(Time(15)), vec![1]);
        assert_eq!(idx.query_at_time(Time(30)), vec![2]);
        assert!(idx.query_at_time(Time(31)).is_empty());
    }

    #[test]
    fn empty_index_returns_nothing() {
        let idx = TemporalIndex::build(Vec::new());
        assert!(idx.is_empty());
        assert!(idx.query_at_time(Time(0)).is_empty());
    }
}
