use crate::framework::{AccessError, DomainObject, ObjectRef, Related};
use crate::model::Person;
use serde_json::{json, Value};
use std::sync::Weak;

/// Fields every vehicle has.
#[derive(Debug, Clone)]
pub struct VehicleInfo {
    pub id: u64,
    pub make: String,
    pub model_year: u16,
    pub serial_number: String,
    pub owner: Weak<Person>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveLayout {
    FrontWheel,
    RearWheel,
    AllWheel,
}

impl DriveLayout {
    fn as_str(self) -> &'static str {
        match self {
            DriveLayout::FrontWheel => "front_wheel",
            DriveLayout::RearWheel => "rear_wheel",
            DriveLayout::AllWheel => "all_wheel",
        }
    }
}

/// A vehicle owned by a [`Person`].
///
/// One Rust type covers the whole hierarchy; [`DomainObject::type_name`] reports the
/// variant (`Car`, `Boat`, `Bicycle`) so each resolves to its own resource kind.
#[derive(Debug, Clone)]
pub enum Vehicle {
    Car {
        info: VehicleInfo,
        drive_layout: DriveLayout,
        doors: u8,
    },
    Boat {
        info: VehicleInfo,
        length_in_feet: u32,
    },
    Bicycle {
        info: VehicleInfo,
    },
}

impl Vehicle {
    pub fn info(&self) -> &VehicleInfo {
        match self {
            Vehicle::Car { info, .. } | Vehicle::Boat { info, .. } | Vehicle::Bicycle { info } => info,
        }
    }
}

impl DomainObject for Vehicle {
    fn type_name(&self) -> &str {
        match self {
            Vehicle::Car { .. } => "Car",
            Vehicle::Boat { .. } => "Boat",
            Vehicle::Bicycle { .. } => "Bicycle",
        }
    }

    fn id(&self) -> String {
        self.info().id.to_string()
    }

    fn field(&self, name: &str) -> Result<Value, AccessError> {
        let info = self.info();
        match (self, name) {
            (_, "make") => Ok(json!(info.make)),
            (_, "model_year") => Ok(json!(info.model_year)),
            (_, "serial_number") => Ok(json!(info.serial_number)),
            (Vehicle::Car { drive_layout, .. }, "drive_layout") => Ok(json!(drive_layout.as_str())),
            (Vehicle::Car { doors, .. }, "doors") => Ok(json!(doors)),
            (Vehicle::Boat { length_in_feet, .. }, "length_in_feet") => Ok(json!(length_in_feet)),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }

    fn relation(&self, name: &str) -> Result<Related, AccessError> {
        match name {
            "owner" => Ok(Related::One(self.info().owner.upgrade().map(|p| p as ObjectRef))),
            _ => Err(AccessError::no_such_member(self.type_name(), name)),
        }
    }
}
