// ABOUTME: Ancestor-walk helpers over a minimal DOM element trait.
// ABOUTME: Answers "is this element, or something above it, chrome?" without recursion scattered through callers.

use scraper::{ElementRef, Selector};

/// The two capabilities the ancestry helpers need from a DOM element.
pub trait DomElement: Sized {
    /// The nearest enclosing element, skipping document and fragment nodes.
    fn parent_element(&self) -> Option<Self>;

    /// Whether this element matches `selector`.
    fn matches(&self, selector: &Selector) -> bool;
}

impl<'a> DomElement for ElementRef<'a> {
    fn parent_element(&self) -> Option<Self> {
        let mut current = self.parent();
        while let Some(node) = current {
            if let Some(el) = ElementRef::wrap(node) {
                return Some(el);
            }
            current = node.parent();
        }
        None
    }

    fn matches(&self, selector: &Selector) -> bool {
        selector.matches(self)
    }
}

/// Returns the element itself or its nearest ancestor matching `selector`.
pub fn closest<E: DomElement>(element: E, selector: &Selector) -> Option<E> {
    let mut current = Some(element);
    while let Some(el) = current {
        if el.matches(selector) {
            return Some(el);
        }
        current = el.parent_element();
    }
    None
}

/// Returns true if the element or any ancestor matches `selector`.
pub fn is_within<E: DomElement>(element: E, selector: &Selector) -> bool {
    closest(element, selector).is_some()
}
