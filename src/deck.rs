use crate::store::{Shortcut, ShortcutId};
use derive_more::{Display, From, Into};
use orbit::{CardFactory, PageIndicator, Transform, TransformApplier};
use palette::Srgb;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct CardId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Easing {
    pub transform: Transform,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Card {
    pub shortcut: ShortcutId,
    pub title: String,
    pub color: Srgb<u8>,
    pub index: usize,
    pub transform: Option<Transform>,
    pub easing: Option<Easing>,
}

impl Card {
    /// Where the card is, or is heading.
    pub fn resolved(&self) -> Option<&Transform> {
        self.easing
            .as_ref()
            .map(|e| &e.transform)
            .or(self.transform.as_ref())
    }

    pub fn interactive(&self) -> bool {
        self.resolved().is_none_or(|t| t.interactive)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardSummary {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub interactive: bool,
}

#[derive(Debug, Default)]
pub struct Deck {
    next_id: u64,
    cards: BTreeMap<CardId, Card>,
    placeholder: bool,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn showing_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Cards in list order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        let mut cards: Vec<&Card> = self.cards.values().collect();
        cards.sort_by_key(|c| c.index);
        cards.into_iter()
    }

    /// Finishes every transition in flight.
    pub fn settle(&mut self) {
        for card in self.cards.values_mut() {
            if let Some(easing) = card.easing.take() {
                card.transform = Some(easing.transform);
            }
        }
    }

    pub fn summaries(&self) -> Vec<CardSummary> {
        self.cards()
            .map(|c| CardSummary {
                index: c.index,
                id: c.shortcut.to_string(),
                title: c.title.clone(),
                interactive: c.interactive(),
            })
            .collect()
    }

    /// Cards back to front, then the page dots.
    pub fn render(&self, indicator: Option<PageIndicator>) -> String {
        let mut out = String::new();

        if self.placeholder {
            out.push_str("  (no shortcuts in this category)\n");
            return out;
        }

        let mut cards: Vec<&Card> = self.cards.values().collect();
        cards.sort_by_key(|c| (c.resolved().map_or(0, |t| t.z_index), c.index));

        for card in cards {
            let _ = write!(out, "  {:>3} #{:x} {:<16}", card.index, card.color, card.title);
            if let Some(t) = card.resolved() {
                let _ = write!(
                    out,
                    " x={:+7.1} y={:+7.1} z={:+6.1} rot={:+6.1} scale={:.2} alpha={:.2} z-index={}",
                    t.x, t.y, t.z, t.rotate_y, t.scale, t.opacity, t.z_index
                );
                if !t.interactive {
                    out.push_str(" (inert)");
                }
            }
            out.push('\n');
        }

        if let Some(indicator) = indicator {
            let dots: String = indicator
                .dots()
                .map(|active| if active { '●' } else { '○' })
                .collect();
            let _ = writeln!(out, "  {}", dots);
        }
        out
    }
}

impl CardFactory<Shortcut> for Deck {
    type Handle = CardId;

    fn materialize(&mut self, item: &Shortcut, index: usize) -> CardId {
        self.placeholder = false;
        self.next_id += 1;
        let id = CardId(self.next_id);
        self.cards.insert(
            id,
            Card {
                shortcut: item.id.clone(),
                title: item.title.clone(),
                color: item.color(),
                index,
                transform: None,
                easing: None,
            },
        );
        id
    }

    fn destroy(&mut self, handle: CardId) {
        if self.cards.remove(&handle).is_none() {
            log::warn!("deck: destroy of unknown card {}", handle);
        }
    }

    fn show_placeholder(&mut self) {
        self.placeholder = true;
    }
}

impl TransformApplier<CardId> for Deck {
    fn apply_immediate(&mut self, handle: &CardId, transform: &Transform) {
        if let Some(card) = self.cards.get_mut(handle) {
            card.transform = Some(*transform);
            card.easing = None;
        }
    }

    fn apply_eased(&mut self, handle: &CardId, transform: &Transform, duration: Duration) {
        if let Some(card) = self.cards.get_mut(handle) {
            card.easing = Some(Easing {
                transform: *transform,
                duration,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CategoryId;

    fn shortcut(title: &str) -> Shortcut {
        Shortcut {
            id: ShortcutId::new(title.to_lowercase()),
            title: title.to_string(),
            url: format!("https://{}.example", title.to_lowercase()),
            color: "#112233".to_string(),
            icon: String::new(),
            layer: CategoryId::from(0),
        }
    }

    fn transform(z_index: i32, interactive: bool) -> Transform {
        Transform {
            z_index,
            interactive,
            ..Transform::default()
        }
    }

    #[test]
    fn test_eased_target_is_superseded() {
        let mut deck = Deck::new();
        let id = deck.materialize(&shortcut("Google"), 0);
        deck.apply_immediate(&id, &transform(50, true));
        deck.apply_eased(&id, &transform(70, true), Duration::from_millis(250));
        deck.apply_eased(&id, &transform(90, false), Duration::from_millis(250));

        let card = &deck.cards[&id];
        assert_eq!(card.transform.unwrap().z_index, 50);
        assert_eq!(card.resolved().unwrap().z_index, 90);
        assert!(!card.interactive());

        deck.settle();
        let card = &deck.cards[&id];
        assert!(card.easing.is_none());
        assert_eq!(card.transform.unwrap().z_index, 90);
    }

    #[test]
    fn test_render_orders_back_to_front() {
        let mut deck = Deck::new();
        let near = deck.materialize(&shortcut("Near"), 0);
        let far = deck.materialize(&shortcut("Far"), 1);
        deck.apply_immediate(&near, &transform(100, true));
        deck.apply_immediate(&far, &transform(50, false));

        let frame = deck.render(Some(PageIndicator {
            total_pages: 3,
            active_page: 1,
        }));
        let far_at = frame.find("Far").unwrap();
        let near_at = frame.find("Near").unwrap();
        assert!(far_at < near_at);
        assert!(frame.contains("#112233"));
        assert!(frame.contains("(inert)"));
        assert!(frame.contains("○●○"));
    }

    #[test]
    fn test_placeholder_until_materialized() {
        let mut deck = Deck::new();
        let id = deck.materialize(&shortcut("Gone"), 0);
        deck.destroy(id);
        deck.show_placeholder();
        assert!(deck.is_empty());
        assert!(deck.render(None).contains("no shortcuts"));

        deck.materialize(&shortcut("Back"), 0);
        assert!(!deck.showing_placeholder());
    }
}
