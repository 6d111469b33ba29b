//! Greedy partition of rendered lines into size-bounded pages.

use std::num::NonZeroUsize;

/// One pre-formatted line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    text: String,
    len: usize,
}

impl RenderedItem {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self { text, len }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters, the unit Telegram's message limit uses.
    pub fn len(&self) -> usize {
        self.len
    }
}

/// Consecutive items whose combined length fits the page budget.
///
/// A page holding a single item longer than the budget is the only one
/// allowed to exceed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    items: Vec<RenderedItem>,
    len: usize,
}

impl Page {
    pub fn items(&self) -> &[RenderedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The page's items concatenated in order.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.items().iter().map(|i| i.text().len()).sum());
        for item in self.items() {
            text.push_str(item.text());
        }
        text
    }

    fn push(&mut self, item: RenderedItem) {
        self.len += item.len();
        self.items.push(item);
    }
}

/// Split `items` into pages of at most `budget` characters.
///
/// Items are never dropped, split or reordered. An empty input still
/// yields one (empty) page so navigation always has a position.
pub fn paginate(items: impl IntoIterator<Item = RenderedItem>, budget: NonZeroUsize) -> Vec<Page> {
    let budget = budget.get();
    let mut pages = Vec::new();
    let mut current = Page::default();

    for item in items {
        if !current.is_empty() && current.len() + item.len() > budget {
            pages.push(std::mem::take(&mut current));
        }
        current.push(item);
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn items(lengths: &[usize]) -> Vec<RenderedItem> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| {
                let c = char::from(b'a' + (i % 26) as u8);
                RenderedItem::new(c.to_string().repeat(len))
            })
            .collect()
    }

    fn flatten(pages: &[Page]) -> Vec<RenderedItem> {
        pages.iter().flat_map(|p| p.items().iter().cloned()).collect()
    }

    #[test]
    fn test_greedy_packing_scenario() {
        let pages = paginate(items(&[500; 7]), budget(1400));
        let counts: Vec<usize> = pages.iter().map(|p| p.items().len()).collect();
        assert_eq!(counts, vec![2, 2, 2, 1]);
    }

    #[test]
    fn test_empty_input_single_empty_page() {
        let pages = paginate(Vec::new(), budget(100));
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
        assert_eq!(pages[0].text(), "");
    }

    #[test]
    fn test_round_trip_and_budget() {
        let cases: &[(&[usize], usize)] = &[
            (&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 10),
            (&[10, 10, 10], 10),
            (&[3, 50, 3, 3], 10),
            (&[7], 3),
            (&[0, 0, 5, 0], 5),
            (&[99, 1, 1, 98, 2], 100),
        ];

        for (lengths, limit) in cases {
            let input = items(lengths);
            let pages = paginate(input.clone(), budget(*limit));

            assert_eq!(flatten(&pages), input, "lossless for {:?}", lengths);
            for page in &pages {
                assert!(!page.is_empty(), "no empty pages for {:?}", lengths);
                assert!(
                    page.len() <= *limit || page.items().len() == 1,
                    "page of {} over budget {} for {:?}",
                    page.len(),
                    limit,
                    lengths
                );
            }
        }
    }

    #[test]
    fn test_oversized_item_gets_own_page() {
        let pages = paginate(items(&[2, 20, 2]), budget(5));
        let counts: Vec<usize> = pages.iter().map(|p| p.items().len()).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(pages[1].len(), 20);
    }

    #[test]
    fn test_length_counts_characters() {
        let item = RenderedItem::new("Grupo · ☀️");
        assert_eq!(item.len(), "Grupo · ☀️".chars().count());
        assert!(item.len() < "Grupo · ☀️".len());
    }
}
