//! Trip requests and generated itineraries

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::GuideError;

/// Longest trip the form accepts
pub const MAX_DAYS: i64 = 30;

/// Most nights the form accepts
pub const MAX_NIGHTS: i64 = 29;

/// Suffix appended to every saved itinerary
pub const FILENAME_SUFFIX: &str = "_itinerary.txt";

/// A validated trip submission
///
/// Only obtainable through [`TripRequest::new`], so every instance has a
/// non-empty trimmed destination, at least one day and a non-negative night count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRequest {
    destination: String,
    days: u32,
    nights: u32,
    interests: Option<String>,
}

impl TripRequest {
    /// Validate raw form values
    pub fn new(
        destination: impl AsRef<str>,
        days: i64,
        nights: i64,
        interests: Option<&str>,
    ) -> Result<Self, GuideError> {
        let destination = destination.as_ref().trim();
        debug!(%destination, %days, %nights, "TripRequest::new: called");

        if destination.is_empty() {
            return Err(GuideError::ValidationFailed("destination must not be empty".to_string()));
        }
        if days < 1 {
            return Err(GuideError::ValidationFailed(format!("days must be at least 1, got {}", days)));
        }
        if nights < 0 {
            return Err(GuideError::ValidationFailed(format!(
                "nights must not be negative, got {}",
                nights
            )));
        }

        let days = u32::try_from(days)
            .map_err(|_| GuideError::ValidationFailed(format!("days is too large, got {}", days)))?;
        let nights = u32::try_from(nights)
            .map_err(|_| GuideError::ValidationFailed(format!("nights is too large, got {}", nights)))?;
        let interests = interests.filter(|s| !s.trim().is_empty()).map(str::to_string);

        Ok(Self {
            destination: destination.to_string(),
            days,
            nights,
            interests,
        })
    }

    /// Validate values typed into the interactive form
    ///
    /// On top of [`TripRequest::new`], the form caps the trip at
    /// [`MAX_DAYS`] days and [`MAX_NIGHTS`] nights.
    pub fn from_form(destination: &str, days: &str, nights: &str, interests: &str) -> Result<Self, GuideError> {
        let days = parse_count("days", days)?;
        let nights = parse_count("nights", nights)?;
        let request = Self::new(destination, days, nights, Some(interests))?;

        if days > MAX_DAYS {
            return Err(GuideError::ValidationFailed(format!(
                "days must be between 1 and {}, got {}",
                MAX_DAYS, days
            )));
        }
        if nights > MAX_NIGHTS {
            return Err(GuideError::ValidationFailed(format!(
                "nights must be between 0 and {}, got {}",
                MAX_NIGHTS, nights
            )));
        }
        Ok(request)
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn nights(&self) -> u32 {
        self.nights
    }

    /// Interests, absent when the user left the field blank
    pub fn interests(&self) -> Option<&str> {
        self.interests.as_deref()
    }
}

fn parse_count(field: &str, raw: &str) -> Result<i64, GuideError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| GuideError::ValidationFailed(format!("{} must be a whole number, got '{}'", field, raw.trim())))
}

/// Filename offered for downloading an itinerary
///
/// Spaces become underscores. Path separators do too, so the file always
/// lands in the chosen directory.
pub fn download_filename(destination: &str) -> String {
    let stem: String = destination
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{}{}", stem, FILENAME_SUFFIX)
}

/// A generated itinerary ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub destination: String,
    pub text: String,
}

impl Itinerary {
    pub fn new(request: &TripRequest, text: String) -> Self {
        Self {
            destination: request.destination().to_string(),
            text,
        }
    }

    pub fn download_filename(&self) -> String {
        download_filename(&self.destination)
    }

    /// Write the itinerary into `dir`, returning the full path
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        debug!(?dir, "Itinerary::save: called");
        fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;
        let path = dir.join(self.download_filename());
        fs::write(&path, &self.text).context(format!("Failed to write {}", path.display()))?;
        info!("Saved itinerary to {}", path.display());
        Ok(path)
    }
}
