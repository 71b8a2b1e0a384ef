/// Per-depth numbering state of the ordered list threads open at one point
/// in document order. Each depth holds the number its next item carries.
///
/// Both converters replay the same counters, so a `start` attribute written
/// on output is read back as "continues the thread" rather than as a new
/// override. Numbers saturate at `u32::MAX`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadItemCounts(Vec<u32>);

impl ThreadItemCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next item at `depth` will carry, if a list is open there.
    pub fn get(&self, depth: usize) -> Option<u32> {
        self.0.get(depth).copied()
    }

    /// An `<ol>` with `start` was read at `depth`. Returns the start number
    /// to record as an override when it does not continue the counter
    /// already open at that depth.
    pub fn open_parsed_list(&mut self, depth: usize, start: u32) -> Option<u32> {
        let continues = self.get(depth) == Some(start);
        let start_override = if continues {
            None
        } else {
            self.set(depth, start);
            Some(start)
        };
        self.0.truncate(depth + 1);
        start_override
    }

    /// A new ordered list element is written at `depth`. Returns the number
    /// its first item will carry.
    pub fn open_rendered_list(&mut self, depth: usize, start_override: Option<u32>) -> u32 {
        match start_override {
            Some(start) => self.set(depth, start),
            None => self.ensure(depth),
        }
        self.0.truncate(depth + 1);
        self.0[depth]
    }

    /// An ordered item at `depth` was read or written. Returns its number.
    pub fn next_item(&mut self, depth: usize) -> u32 {
        self.ensure(depth);
        let number = self.0[depth];
        self.0[depth] = number.saturating_add(1);
        number
    }

    fn ensure(&mut self, depth: usize) {
        if self.0.len() <= depth {
            self.0.resize(depth + 1, 1);
        }
    }

    fn set(&mut self, depth: usize, value: u32) {
        self.ensure(depth);
        self.0[depth] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_lists_detect_overrides() {
        let mut counts = ThreadItemCounts::new();
        // First list always records its start.
        assert_eq!(counts.open_parsed_list(0, 1), Some(1));
        counts.next_item(0);
        counts.next_item(0);
        // Continues at 3.
        assert_eq!(counts.open_parsed_list(0, 3), None);
        counts.next_item(0);
        // Restart.
        assert_eq!(counts.open_parsed_list(0, 1), Some(1));
        assert_eq!(counts.get(0), Some(1));
    }

    #[test]
    fn test_zero_start_is_an_override() {
        let mut counts = ThreadItemCounts::new();
        assert_eq!(counts.open_parsed_list(0, 0), Some(0));
        assert_eq!(counts.next_item(0), 0);
        assert_eq!(counts.next_item(0), 1);

        let mut counts = ThreadItemCounts::new();
        assert_eq!(counts.open_rendered_list(0, Some(0)), 0);
        assert_eq!(counts.next_item(0), 0);
    }

    #[test]
    fn test_numbers_saturate() {
        let mut counts = ThreadItemCounts::new();
        assert_eq!(counts.open_parsed_list(0, u32::MAX), Some(u32::MAX));
        assert_eq!(counts.next_item(0), u32::MAX);
        assert_eq!(counts.next_item(0), u32::MAX);
        assert_eq!(counts.open_parsed_list(0, u32::MAX), None);

        let mut counts = ThreadItemCounts::new();
        assert_eq!(counts.open_rendered_list(0, Some(u32::MAX)), u32::MAX);
        assert_eq!(counts.next_item(0), u32::MAX);
        assert_eq!(counts.next_item(0), u32::MAX);
    }

    #[test]
    fn test_rendered_lists_replay_counters() {
        let mut counts = ThreadItemCounts::new();
        assert_eq!(counts.open_rendered_list(0, Some(1)), 1);
        assert_eq!(counts.next_item(0), 1);
        assert_eq!(counts.next_item(0), 2);
        assert_eq!(counts.open_rendered_list(1, None), 1);
        assert_eq!(counts.next_item(1), 1);
        assert_eq!(counts.open_rendered_list(0, None), 3);
        assert_eq!(counts.get(1), None);
        assert_eq!(counts.open_rendered_list(0, Some(10)), 10);
    }
}
