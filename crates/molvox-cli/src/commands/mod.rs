pub mod inspect;
pub mod voxelize;
