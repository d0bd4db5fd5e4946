//! Opaque page tokens
//!
//! A page token is a LIFO stack of frames, each naming the resource type
//! being paged and the remote cursor for that phase. Syncers decode the
//! token on entry, push/pop frames and update the top cursor, then encode
//! it again for the caller. An empty token on output means the traversal
//! is complete.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};
use crate::ids::ResourceId;

/// One frame of a page token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Resource type being paged in this phase.
    pub resource_type_id: String,

    /// Resource the phase belongs to, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_id: String,

    /// Remote cursor; empty on the first page of the phase.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl PageState {
    /// A fresh frame for a resource type.
    pub fn for_type(resource_type_id: impl Into<String>) -> Self {
        Self {
            resource_type_id: resource_type_id.into(),
            resource_id: String::new(),
            token: String::new(),
        }
    }
}

/// Stack of page frames carried inside an opaque page token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    states: Vec<PageState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_state: Option<PageState>,
}

impl Bag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a page token, seeding it with `initial` when it is empty.
    ///
    /// Returns the bag and the remote cursor of its current frame.
    pub fn parse(token: &str, initial: &ResourceId) -> ConnectorResult<(Self, String)> {
        let mut bag = Self::unmarshal(token)?;
        if bag.current_state.is_none() {
            bag.push(PageState {
                resource_type_id: initial.resource_type.clone(),
                resource_id: initial.resource.clone(),
                token: String::new(),
            });
        }
        let page = bag.page_token().to_string();
        Ok((bag, page))
    }

    /// Decode a page token. An empty token yields an empty bag.
    pub fn unmarshal(token: &str) -> ConnectorResult<Self> {
        if token.is_empty() {
            return Ok(Self::new());
        }

        let bytes =
            URL_SAFE_NO_PAD
                .decode(token)
                .map_err(|e| ConnectorError::InvalidPageToken {
                    message: e.to_string(),
                })?;

        serde_json::from_slice(&bytes).map_err(|e| ConnectorError::InvalidPageToken {
            message: e.to_string(),
        })
    }

    /// Encode the bag. An exhausted bag encodes to the empty string.
    pub fn marshal(&self) -> ConnectorResult<String> {
        if self.current_state.is_none() {
            return Ok(String::new());
        }

        let bytes = serde_json::to_vec(self).map_err(|e| ConnectorError::Serialization {
            message: format!("failed to encode page token: {e}"),
        })?;

        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// The current frame.
    #[must_use]
    pub fn current(&self) -> Option<&PageState> {
        self.current_state.as_ref()
    }

    /// Resource type of the current frame.
    #[must_use]
    pub fn resource_type_id(&self) -> Option<&str> {
        self.current_state
            .as_ref()
            .map(|s| s.resource_type_id.as_str())
    }

    /// Remote cursor of the current frame, empty if none.
    #[must_use]
    pub fn page_token(&self) -> &str {
        self.current_state
            .as_ref()
            .map_or("", |s| s.token.as_str())
    }

    /// Whether the traversal is complete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_state.is_none()
    }

    /// Push a frame; it becomes current.
    pub fn push(&mut self, state: PageState) {
        if let Some(current) = self.current_state.take() {
            self.states.push(current);
        }
        self.current_state = Some(state);
    }

    /// Push frames so they are visited in the given order.
    pub fn push_all<I>(&mut self, states: I)
    where
        I: IntoIterator<Item = PageState>,
        I::IntoIter: DoubleEndedIterator,
    {
        for state in states.into_iter().rev() {
            self.push(state);
        }
    }

    /// Pop the current frame; the next stacked frame becomes current.
    pub fn pop(&mut self) -> Option<PageState> {
        let popped = self.current_state.take();
        self.current_state = self.states.pop();
        popped
    }

    /// Record the cursor returned for the current frame.
    ///
    /// An empty cursor means the phase is exhausted and the frame is popped.
    pub fn next(&mut self, cursor: &str) -> ConnectorResult<()> {
        let Some(mut state) = self.pop() else {
            return Err(ConnectorError::InvalidPageToken {
                message: "no active page state".to_string(),
            });
        };

        if !cursor.is_empty() {
            state.token = cursor.to_string();
            self.push(state);
        }

        Ok(())
    }

    /// [`Bag::next`] followed by [`Bag::marshal`].
    pub fn next_token(&mut self, cursor: &str) -> ConnectorResult<String> {
        self.next(cursor)?;
        self.marshal()
    }
}
