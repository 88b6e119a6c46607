//! Customer records: the stop payload of the sales app.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::point::Point;
use crate::traits::{AddressQuery, Stop};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub phone: Vec<String>,
    #[serde(default)]
    pub secondary_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    pub fn with_location(mut self, point: Point) -> Self {
        self.set_location(point);
        self
    }

    pub fn set_location(&mut self, point: Point) {
        self.latitude = Some(point.lat);
        self.longitude = Some(point.lng);
    }

    pub fn address_query(&self) -> AddressQuery {
        AddressQuery {
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }
}

impl Stop for Customer {
    fn location(&self) -> Option<Point> {
        Point::from_parts(self.latitude, self.longitude)
    }

    fn locality(&self) -> Option<&str> {
        self.neighborhood.as_deref()
    }

    fn address(&self) -> Option<&str> {
        Some(self.address.as_str()).filter(|address| !address.trim().is_empty())
    }
}

pub fn load_customers(path: impl AsRef<Path>) -> Result<Vec<Customer>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Writes through a temporary file so a crash never leaves half a list.
pub fn save_customers(path: impl AsRef<Path>, customers: &[Customer]) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, serde_json::to_vec_pretty(customers)?)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_app_json() {
        let raw = r#"[{
            "id": "1",
            "name": "Maria",
            "address": "Rua das Flores, 10",
            "neighborhood": "Tirol",
            "phone": ["84 99999-0000"],
            "secondaryAddresses": [],
            "lastVisit": "2026-09-30",
            "latitude": -5.79,
            "longitude": -35.2
        }]"#;
        let customers: Vec<Customer> = serde_json::from_str(raw).unwrap();
        assert_eq!(customers[0].last_visit.as_deref(), Some("2026-09-30"));
        assert_eq!(customers[0].location(), Some(Point::new(-5.79, -35.2)));
        assert_eq!(customers[0].locality(), Some("Tirol"));
    }

    #[test]
    fn half_coordinates_are_unlocatable() {
        let mut customer = Customer::new("1", "João", "Av. Prudente, 5");
        customer.latitude = Some(-5.8);
        assert_eq!(customer.location(), None);
    }

    #[test]
    fn zero_is_a_real_coordinate() {
        let customer = Customer::new("1", "Equator", "Somewhere").with_location(Point::new(0.0, 0.0));
        assert_eq!(customer.location(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn blank_address_is_none() {
        let customer = Customer::new("1", "Sem endereço", "  ");
        assert_eq!(Stop::address(&customer), None);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("rota-planner-customers-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("customers.json");
        let customers = vec![Customer::new("1", "Ana", "Rua A").with_neighborhood("Alecrim")];

        save_customers(&path, &customers).unwrap();
        assert_eq!(load_customers(&path).unwrap(), customers);

        fs::remove_dir_all(dir).unwrap();
    }
}
