use crate::model::{DriveLayout, Person, Post, PostCreate, Tag, Vehicle, VehicleInfo};
use std::sync::{Arc, Weak};

/// Owns every object of the sample data set.
///
/// Objects reference each other through `Arc`/`Weak`; keeping the `Blog` alive keeps
/// every weak back-reference (person to posts, comment to post, vehicle to owner) valid.
#[derive(Debug)]
pub struct Blog {
    pub people: Vec<Arc<Person>>,
    pub posts: Vec<Arc<Post>>,
    pub tags: Vec<Arc<Tag>>,
}

impl Blog {
    /// A small, fully linked data set used by the demo and the integration tests.
    ///
    /// - Joe (1) writes posts 1 and 2 and owns a car, a boat and a bicycle.
    /// - Ana (2) writes post 3, comments on posts 1 and 3, and owns a car.
    /// - Tags 1 (`rust`) and 2 (`serde`) are shared between posts.
    pub fn sample() -> Self {
        let joe = Arc::new_cyclic(|me: &Weak<Person>| {
            Person::new(1, "Joe", "Author", "joe@example.com").with_vehicles(vec![
                Arc::new(Vehicle::Car {
                    info: vehicle_info(1, "Volvo", 2019, "VV-1", me),
                    drive_layout: DriveLayout::FrontWheel,
                    doors: 4,
                }),
                Arc::new(Vehicle::Boat {
                    info: vehicle_info(2, "Boston Whaler", 2015, "BW-2", me),
                    length_in_feet: 17,
                }),
                Arc::new(Vehicle::Bicycle {
                    info: vehicle_info(3, "Brompton", 2021, "BR-3", me),
                }),
            ])
        });
        let ana = Arc::new_cyclic(|me: &Weak<Person>| {
            Person::new(2, "Ana", "Reader", "ana@example.com").with_vehicles(vec![Arc::new(Vehicle::Car {
                info: vehicle_info(4, "Subaru", 2022, "SB-4", me),
                drive_layout: DriveLayout::AllWheel,
                doors: 5,
            })])
        });

        let rust = Arc::new(Tag::new(1, "rust"));
        let serde = Arc::new(Tag::new(2, "serde"));

        let first = Post::publish(
            1,
            joe.clone(),
            PostCreate {
                title: "New post".into(),
                body: "A body!!!".into(),
                tags: vec![rust.clone(), serde.clone()],
                comments: vec![(1, ana.clone(), "Great read".into()), (2, joe.clone(), "Thanks!".into())],
            },
        );
        let second = Post::publish(
            2,
            joe.clone(),
            PostCreate {
                title: "JSON:API paints my bikeshed!".into(),
                body: "The shortest article. Ever.".into(),
                tags: vec![rust.clone()],
                comments: Vec::new(),
            },
        );
        let third = Post::publish(
            3,
            ana.clone(),
            PostCreate {
                title: "Reader's notes".into(),
                body: "Notes on compound documents".into(),
                tags: vec![serde.clone()],
                comments: vec![(3, ana.clone(), "Adding more later".into())],
            },
        );

        joe.set_posts(&[first.clone(), second.clone()]);
        ana.set_posts(&[third.clone()]);

        Self {
            people: vec![joe, ana],
            posts: vec![first, second, third],
            tags: vec![rust, serde],
        }
    }

    pub fn person(&self, id: u64) -> Option<Arc<Person>> {
        self.people.iter().find(|p| p.id == id).cloned()
    }

    pub fn post(&self, id: u64) -> Option<Arc<Post>> {
        self.posts.iter().find(|p| p.id == id).cloned()
    }
}

fn vehicle_info(id: u64, make: &str, model_year: u16, serial_number: &str, owner: &Weak<Person>) -> VehicleInfo {
    VehicleInfo {
        id,
        make: make.to_string(),
        model_year,
        serial_number: serial_number.to_string(),
        owner: owner.clone(),
    }
}
