//! Company registry: operating units and default contacts per company.
//!
//! `name` is the unique human lookup key. Every profile also carries a
//! generated id that stays stable across renames, so rate and sauda
//! documents referencing the company by name can be re-linked after a
//! rename instead of silently orphaned.

use crate::core::error::{LedgerError, Result};
use crate::store::{DocumentCollection, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactCard {
    pub primary_mobile: String,
    pub contact_person: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Stable identifier, preserved across renames.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub locations: BTreeSet<String>,
    #[serde(default)]
    pub commodities: BTreeSet<String>,
    #[serde(default)]
    pub sub_commodities: BTreeSet<String>,
    /// Default contacts keyed by `location|commodity` (see [`crate::core::sauda::unit_key`]).
    #[serde(default)]
    pub contacts: BTreeMap<String, ContactCard>,
}

/// Registration payload. Registering an existing name merges into the
/// profile instead of duplicating it.
#[derive(Debug, Clone, Default)]
pub struct CompanyRegistration {
    pub name: String,
    pub state: String,
    pub category: String,
    pub locations: Vec<String>,
    pub commodities: Vec<String>,
    pub sub_commodities: Vec<String>,
    pub contacts: BTreeMap<String, ContactCard>,
}

impl CompanyRegistration {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::required("name"));
        }
        Ok(())
    }
}

impl CompanyProfile {
    fn from_registration(registration: &CompanyRegistration) -> Self {
        let mut profile = Self {
            id: Uuid::new_v4().to_string(),
            name: registration.name.clone(),
            state: String::new(),
            category: String::new(),
            locations: BTreeSet::new(),
            commodities: BTreeSet::new(),
            sub_commodities: BTreeSet::new(),
            contacts: BTreeMap::new(),
        };
        profile.absorb(registration);
        profile
    }

    /// Merge-on-write: set unions for units and commodities, so re-adding an
    /// existing location is a no-op. Non-empty scalar fields overwrite.
    pub fn absorb(&mut self, registration: &CompanyRegistration) {
        if !registration.state.trim().is_empty() {
            self.state = registration.state.clone();
        }
        if !registration.category.trim().is_empty() {
            self.category = registration.category.clone();
        }
        self.locations.extend(registration.locations.iter().cloned());
        self.commodities
            .extend(registration.commodities.iter().cloned());
        self.sub_commodities
            .extend(registration.sub_commodities.iter().cloned());
        for (unit, card) in &registration.contacts {
            self.contacts.insert(unit.clone(), card.clone());
        }
    }
}

/// Manager for the company profile collection, keyed by name.
pub struct CompanyRegistry {
    collection: Arc<dyn DocumentCollection>,
}

impl CompanyRegistry {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    /// Creates the profile, or merges into the same-named one.
    pub async fn register(&self, registration: CompanyRegistration) -> Result<CompanyProfile> {
        registration.validate()?;

        let profile = match self.load(&registration.name).await? {
            Some(mut existing) => {
                existing.absorb(&registration);
                existing
            }
            None => CompanyProfile::from_registration(&registration),
        };

        self.save(&profile).await?;
        debug!(name = %profile.name, "Company profile upserted");
        Ok(profile)
    }

    pub async fn get(&self, name: &str) -> Result<Option<CompanyProfile>> {
        self.load(name).await
    }

    pub async fn list(&self) -> Result<Vec<CompanyProfile>> {
        let mut profiles = Vec::new();
        for (_, bytes) in self.collection.scan().await? {
            profiles.push(serde_json::from_slice(&bytes).map_err(StoreError::Codec)?);
        }
        Ok(profiles)
    }

    /// Deletes the profile. Rate and sauda documents referencing the name
    /// are left in place.
    pub async fn remove(&self, name: &str) -> Result<()> {
        if !self.collection.remove(name).await? {
            return Err(LedgerError::NotFound {
                entity: "company",
                key: name.to_string(),
            });
        }
        debug!(name, "Company profile removed");
        Ok(())
    }

    /// Renames a company, keeping its stable id.
    pub async fn rename(&self, from: &str, to: &str) -> Result<CompanyProfile> {
        if to.trim().is_empty() {
            return Err(LedgerError::required("name"));
        }
        if self.load(to).await?.is_some() {
            return Err(LedgerError::Conflict {
                entity: "company",
                name: to.to_string(),
            });
        }

        let mut profile = self.load(from).await?.ok_or_else(|| LedgerError::NotFound {
            entity: "company",
            key: from.to_string(),
        })?;
        profile.name = to.to_string();

        self.save(&profile).await?;
        self.collection.remove(from).await?;
        debug!(from, to, "Company renamed");
        Ok(profile)
    }

    async fn load(&self, name: &str) -> Result<Option<CompanyProfile>> {
        match self.collection.get(name).await? {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes).map_err(StoreError::Codec)?,
            )),
            None => Ok(None),
        }
    }

    async fn save(&self, profile: &CompanyProfile) -> Result<()> {
        let bytes = serde_json::to_vec(profile).map_err(StoreError::Codec)?;
        self.collection.put(&profile.name, &bytes).await?;
        Ok(())
    }
}
