use crate::core::models::element::Element;
use itertools::Itertools;
use thiserror::Error;

/// Channels used when the caller does not choose any: carbon, nitrogen,
/// oxygen, sulfur.
pub const DEFAULT_TRACKED_ELEMENTS: [Element; 4] = [Element::C, Element::N, Element::O, Element::S];

/// Voxel edge length in Angstroms.
pub const DEFAULT_VOXEL_SIZE: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("The tracked element set must not be empty")]
    NoTrackedElements,

    #[error("Element '{0}' appears more than once in the tracked element set")]
    DuplicateElement(Element),

    #[error("Unknown elements cannot be tracked as a channel")]
    UnknownElementTracked,

    #[error("Voxel size must be a positive finite number (got {0})")]
    InvalidVoxelSize(f64),
}

/// Validates a tracked-element list: non-empty, no duplicates, no `Unknown`.
pub fn validate_tracked_elements(elements: &[Element]) -> Result<(), ConfigError> {
    if elements.is_empty() {
        return Err(ConfigError::NoTrackedElements);
    }
    if elements.contains(&Element::Unknown) {
        return Err(ConfigError::UnknownElementTracked);
    }
    if let Some(dup) = elements.iter().duplicates().next() {
        return Err(ConfigError::DuplicateElement(*dup));
    }
    Ok(())
}

pub fn validate_voxel_size(voxel_size: f64) -> Result<(), ConfigError> {
    if voxel_size.is_finite() && voxel_size > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidVoxelSize(voxel_size))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoxelizationConfig {
    /// Channel order of the produced grid.
    pub tracked_elements: Vec<Element>,
    /// Edge length of one voxel, in Angstroms.
    pub voxel_size: f64,
}

impl VoxelizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tracked_elements(&self.tracked_elements)?;
        validate_voxel_size(self.voxel_size)
    }
}

impl Default for VoxelizationConfig {
    fn default() -> Self {
        Self {
            tracked_elements: DEFAULT_TRACKED_ELEMENTS.to_vec(),
            voxel_size: DEFAULT_VOXEL_SIZE,
        }
    }
}

#[derive(Default)]
pub struct VoxelizationConfigBuilder {
    tracked_elements: Option<Vec<Element>>,
    voxel_size: Option<f64>,
}

impl VoxelizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_elements(mut self, elements: Vec<Element>) -> Self {
        self.tracked_elements = Some(elements);
        self
    }
    pub fn voxel_size(mut self, size: f64) -> Self {
        self.voxel_size = Some(size);
        self
    }

    pub fn build(self) -> Result<VoxelizationConfig, ConfigError> {
        let config = VoxelizationConfig {
            tracked_elements: self
                .tracked_elements
                .unwrap_or_else(|| DEFAULT_TRACKED_ELEMENTS.to_vec()),
            voxel_size: self.voxel_size.unwrap_or(DEFAULT_VOXEL_SIZE),
        };
        config.validate()?;
        Ok(config)
    }
}
