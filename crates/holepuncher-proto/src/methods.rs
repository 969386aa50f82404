//! Named constants for the RPC names carried by the request envelope.
//!
//! The names identify the populated command variant in logs and in protocol
//! bug reports, so they are kept in one place instead of being repeated as
//! string literals across the client and provider layers.

// ---------------------------------------------------------------------------
// Linode tunnel lifecycle
// ---------------------------------------------------------------------------

/// `LinodeCreateTunnel`
pub const METHOD_LINODE_CREATE_TUNNEL: &str = "LinodeCreateTunnel";

/// `LinodeRebuildTunnel`
pub const METHOD_LINODE_REBUILD_TUNNEL: &str = "LinodeRebuildTunnel";

/// `LinodeDestroyTunnel`
pub const METHOD_LINODE_DESTROY_TUNNEL: &str = "LinodeDestroyTunnel";

/// `LinodeGetTunnelStatus`
pub const METHOD_LINODE_TUNNEL_STATUS: &str = "LinodeGetTunnelStatus";

// ---------------------------------------------------------------------------
// Linode catalog queries
// ---------------------------------------------------------------------------

/// `LinodeListInstances`
pub const METHOD_LINODE_LIST_INSTANCES: &str = "LinodeListInstances";

/// `LinodeListPlans`
pub const METHOD_LINODE_LIST_PLANS: &str = "LinodeListPlans";

/// `LinodeListRegions`
pub const METHOD_LINODE_LIST_REGIONS: &str = "LinodeListRegions";

/// `LinodeListImages`
pub const METHOD_LINODE_LIST_IMAGES: &str = "LinodeListImages";

/// `LinodeListStackScripts`
pub const METHOD_LINODE_LIST_STACKSCRIPTS: &str = "LinodeListStackScripts";

/// Placeholder name for an envelope without a command.
pub const METHOD_NONE: &str = "nil";
