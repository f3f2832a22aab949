//! Errand locations that may be inserted into a route.

use super::Coordinates;

/// A task location that a route could detour through.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointCandidate {
    pub id: String,
    pub title: String,
    /// Free-text location, if the user entered one.
    pub location_query: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub completed: bool,
}

impl WaypointCandidate {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location_query: None,
            coordinates: None,
            completed: false,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.location_query = Some(query.into());
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Only open tasks with a known position can be routed through.
    pub fn is_eligible(&self) -> bool {
        !self.completed && self.coordinates.is_some()
    }

    /// The query to hand to the route planner.
    ///
    /// Uses the explicit query text when it isn't blank, otherwise
    /// synthesizes `"lat,lon"` from the coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_planner::domain::{Coordinates, WaypointCandidate};
    ///
    /// let task = WaypointCandidate::new("t1", "Pharmacy")
    ///     .with_query("  ")
    ///     .with_coordinates(Coordinates::new(48.85, 2.35));
    /// assert_eq!(task.resolve_query().as_deref(), Some("48.850000,2.350000"));
    /// ```
    pub fn resolve_query(&self) -> Option<String> {
        match self.location_query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Some(q.to_string()),
            _ => self.coordinates.map(|c| c.to_query()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_query_wins() {
        let task = WaypointCandidate::new("t1", "Bakery")
            .with_query("12 rue de la Roquette, Paris")
            .with_coordinates(Coordinates::new(48.85, 2.37));
        assert_eq!(
            task.resolve_query().as_deref(),
            Some("12 rue de la Roquette, Paris")
        );
    }

    #[test]
    fn no_query_no_coordinates() {
        let task = WaypointCandidate::new("t1", "Somewhere");
        assert!(task.resolve_query().is_none());
        assert!(!task.is_eligible());
    }

    #[test]
    fn completed_tasks_are_not_eligible() {
        let task = WaypointCandidate::new("t1", "Post office")
            .with_coordinates(Coordinates::new(48.85, 2.37))
            .completed();
        assert!(!task.is_eligible());
    }

    #[test]
    fn open_task_with_coordinates_is_eligible() {
        let task =
            WaypointCandidate::new("t1", "Post office").with_coordinates(Coordinates::new(48.85, 2.37));
        assert!(task.is_eligible());
    }
}
