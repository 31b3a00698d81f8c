use crate::types::SurfaceId;

/// Collider `user_data` tag identifying which world static a collider belongs to and
/// which collision layers it is a member of.
///
/// # Why this exists
/// Rapier gives each collider a single `u128` of user data. Probes need both the stable
/// surface identity (to detect "grabbed a new wall") and the layer bits (to honor the
/// query's layer mask), so both are packed into that one value.
///
/// # Bit layout
/// This `u128` is a packed value with the following layout (least-significant bit = bit 0):
///
/// - bits 0..=63   : `SurfaceId` (u64, the `WorldStaticDef::id`)
/// - bits 64..=95  : layer membership bits (u32)
/// - bits 96..=127 : reserved (must be zero for now)
pub type SurfaceTag = u128;

/// Packs a surface id and its layer bits into a [`SurfaceTag`].
pub fn pack_surface(id: SurfaceId, layers: u32) -> SurfaceTag {
    (id as u128) | ((layers as u128) << SurfaceId::BITS)
}

/// Extracts the [`SurfaceId`] from a [`SurfaceTag`].
pub fn unpack_surface_id(tag: SurfaceTag) -> SurfaceId {
    const ID_MASK: u128 = u64::MAX as u128;
    (tag & ID_MASK) as SurfaceId
}

/// Extracts the layer membership bits from a [`SurfaceTag`].
pub fn unpack_surface_layers(tag: SurfaceTag) -> u32 {
    const LAYER_MASK: u128 = u32::MAX as u128;
    ((tag >> SurfaceId::BITS) & LAYER_MASK) as u32
}
