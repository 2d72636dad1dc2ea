//! Interface id to numeric channel translation
//!
//! The signal-acquisition layer indexes its per-channel tables with small
//! dense numeric ids, while decoder manifests and collection schemes refer
//! to network interfaces by a stable textual id (e.g. "can0"). The
//! [`CanIdTranslator`] maps between the two.

use crate::types::{ChannelId, InterfaceId};

/// Maps textual interface ids to dense numeric channel ids
///
/// Channel ids are assigned in registration order and are stable for the
/// lifetime of the translator; the numeric id of an interface is simply its
/// index in the registration list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanIdTranslator {
    interface_ids: Vec<InterfaceId>,
}

impl CanIdTranslator {
    /// Create a new empty translator
    pub fn new() -> Self {
        Self {
            interface_ids: Vec::new(),
        }
    }

    /// Register an interface id, returning its numeric channel id
    ///
    /// Registration is idempotent: adding an already-known interface id
    /// returns the channel id it was first assigned.
    pub fn add(&mut self, interface_id: impl Into<InterfaceId>) -> ChannelId {
        let interface_id = interface_id.into();
        if let Some(channel_id) = self.channel_numeric_id(&interface_id) {
            return channel_id;
        }
        let channel_id = self.interface_ids.len() as ChannelId;
        log::debug!(
            "Interface ID '{}' registered as channel {}",
            interface_id,
            channel_id
        );
        self.interface_ids.push(interface_id);
        channel_id
    }

    /// Look up the numeric channel id of an interface id
    ///
    /// Returns `None` for interface ids that were never registered.
    pub fn channel_numeric_id(&self, interface_id: &str) -> Option<ChannelId> {
        self.interface_ids
            .iter()
            .position(|id| id == interface_id)
            .map(|pos| pos as ChannelId)
    }

    /// Look up the interface id assigned to a numeric channel id
    pub fn interface_id(&self, channel_id: ChannelId) -> Option<&str> {
        self.interface_ids
            .get(channel_id as usize)
            .map(String::as_str)
    }

    /// Number of registered interfaces
    pub fn len(&self) -> usize {
        self.interface_ids.len()
    }

    /// True if no interface has been registered
    pub fn is_empty(&self) -> bool {
        self.interface_ids.is_empty()
    }
}
