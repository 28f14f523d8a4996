//! Read-only lookups into the building catalog.

use crate::{BuildingDef, BuildingId, Category, ColonyError, GameContent};

impl GameContent {
    /// Finds a building by category and id.
    pub fn building(
        &self,
        category: Category,
        id: &BuildingId,
    ) -> Result<&BuildingDef, ColonyError> {
        self.buildings
            .iter()
            .find(|def| def.category == category && def.id == *id)
            .ok_or_else(|| ColonyError::UnknownBuilding {
                category,
                building: id.clone(),
            })
    }

    pub fn buildings_in(&self, category: Category) -> impl Iterator<Item = &BuildingDef> {
        self.buildings
            .iter()
            .filter(move |def| def.category == category)
    }
}
