//! 頁面欄位擷取。
//!
//! 目標網站的元素沒有 id，只能靠相鄰的標籤文字定位，所以每個欄位都用
//! [`Locator`] 描述「在哪個標籤旁邊」，擷取失敗一律回傳 `None`。

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static LIST_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li").expect("Failed to parse li selector"));

static LIST_ITEM_ABBR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li > abbr").expect("Failed to parse li > abbr selector"));

static TABLE_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("Failed to parse td selector"));

/// 欄位在頁面上的結構位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// `<li>label<span>value</span></li>`：li 自身的文字節點完全等於 label
    ListItemSpan(&'static str),
    /// `<li><abbr>label</abbr><span>value</span></li>`：abbr 之後的第一個 span
    AbbrSiblingSpan(&'static str),
    /// 第一個符合 CSS selector 的元素
    FirstElement(&'static str),
}

/// Returns the trimmed text located by `locator`, or `None` when nothing matches.
///
/// A missing label, a changed layout or an empty value are all ordinary
/// outcomes here; no type conversion is attempted.
pub fn extract(document: &Html, locator: &Locator) -> Option<String> {
    let found = match *locator {
        Locator::ListItemSpan(label) => document
            .select(&LIST_ITEM)
            .filter(|li| has_own_text(li, label))
            .find_map(|li| first_child_element(&li, "span")),
        Locator::AbbrSiblingSpan(label) => document
            .select(&LIST_ITEM_ABBR)
            .filter(|abbr| has_own_text(abbr, label))
            .find_map(|abbr| next_sibling_element(&abbr, "span")),
        Locator::FirstElement(css_selector) => Selector::parse(css_selector)
            .ok()
            .and_then(|selector| document.select(&selector).next()),
    }?;

    non_empty_text(&found)
}

/// Returns the trimmed text of the `index`-th cell (`td` or `th`) of a table row.
pub fn cell_text(row: &ElementRef, index: usize) -> Option<String> {
    row.select(&TABLE_CELL)
        .nth(index)
        .and_then(|cell| non_empty_text(&cell))
}

/// 元素自身（不含子元素）的任一文字節點是否完全等於 label
fn has_own_text(element: &ElementRef, label: &str) -> bool {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| &**text == label)
}

fn first_child_element<'a>(element: &ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == name)
}

fn next_sibling_element<'a>(element: &ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == name)
}

fn non_empty_text(element: &ElementRef) -> Option<String> {
    let text = element.text().collect::<String>();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
