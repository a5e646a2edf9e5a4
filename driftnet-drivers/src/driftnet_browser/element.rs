use anyhow::Result;
use fantoccini::{elements::Element, Locator};

#[derive(Clone)]
/// Wrapper for DOM elements that provides typed helpers consistent with
/// [`DriftnetDriver`](crate::driftnet_browser::driver::DriftnetDriver).
pub struct DriftnetElement {
    pub element: Element,
}

impl DriftnetElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// Find zero or more child elements by CSS selector.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<DriftnetElement>> {
        let elements = self.element.find_all(Locator::Css(selector)).await?;
        Ok(elements.into_iter().map(DriftnetElement::new).collect())
    }

    /// Read an attribute value.
    pub async fn get_attribute(&self, attribute: &str) -> Result<Option<String>> {
        self.element
            .attr(attribute)
            .await
            .map_err(anyhow::Error::from)
    }

    /// Return the element's visible text.
    pub async fn get_inner_text(&self) -> Result<String> {
        self.element.text().await.map_err(anyhow::Error::from)
    }
}
