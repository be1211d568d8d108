//! Element verbs built on node invocation.
//!
//! Each verb finds its target by XPath and forwards a node function through
//! [`Browser::invoke`], so the version-gated `Node` argument shape applies
//! uniformly.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::error::Result;

use super::Browser;

// ============================================================================
// Browser - Element Verbs
// ============================================================================

impl Browser {
    /// Returns the tag name of the first node matching `xpath`.
    pub async fn tag_name(&mut self, xpath: &str) -> Result<String> {
        let node = self.find_one(xpath).await?;
        self.invoke("tagName", &node, &[]).await
    }

    /// Sets the form value of the first node matching `xpath`.
    pub async fn set_value(&mut self, xpath: &str, value: &str) -> Result<()> {
        let node = self.find_one(xpath).await?;
        self.invoke("set", &node, &[value]).await?;
        Ok(())
    }

    /// Clicks the first node matching `xpath`.
    pub async fn click(&mut self, xpath: &str) -> Result<()> {
        debug!(xpath, "Clicking");
        let node = self.find_one(xpath).await?;
        self.invoke("leftClick", &node, &[]).await?;
        Ok(())
    }

    /// Sends a mouse-down event to the first node matching `xpath`.
    pub async fn mousedown(&mut self, xpath: &str) -> Result<()> {
        let node = self.find_one(xpath).await?;
        self.invoke("mousedown", &node, &[]).await?;
        Ok(())
    }

    /// Sends a mouse-up event to the first node matching `xpath`.
    pub async fn mouseup(&mut self, xpath: &str) -> Result<()> {
        let node = self.find_one(xpath).await?;
        self.invoke("mouseup", &node, &[]).await?;
        Ok(())
    }

    /// Triggers a DOM event on the first node matching `xpath`.
    ///
    /// Returns `false` without error when the query matches nothing.
    pub async fn trigger(&mut self, xpath: &str, event: &str) -> Result<bool> {
        let nodes = self.find(xpath).await?;
        match nodes.into_iter().next() {
            Some(node) => {
                self.invoke("trigger", &node, &[event]).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns whether the first node matching `xpath` is visible.
    pub async fn visible(&mut self, xpath: &str) -> Result<bool> {
        let node = self.find_one(xpath).await?;
        let payload = self.invoke("visible", &node, &[]).await?;
        Ok(payload == "true")
    }
}
