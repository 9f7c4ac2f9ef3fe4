use crate::models::{HealthcareResource, ResourceType, UrgencyLevel};

/// Sample catalog used for demonstration ranking. Built once at startup and
/// shared read-only; nothing mutates it at runtime.
pub fn sample_catalog() -> Vec<HealthcareResource> {
    vec![
        HealthcareResource {
            name: "Bay Area Urgent Care".to_string(),
            resource_type: ResourceType::UrgentCare,
            distance_miles: 0.8,
            wait_time_range: "15-30 min".to_string(),
            phone: "(555) 123-4567".to_string(),
            address: "123 Market St, San Francisco, CA".to_string(),
            lat: 37.7749,
            lng: -122.4194,
        },
        HealthcareResource {
            name: "UCSF Medical Center".to_string(),
            resource_type: ResourceType::Hospital,
            distance_miles: 2.1,
            wait_time_range: "45-60 min".to_string(),
            phone: "(555) 987-6543".to_string(),
            address: "505 Parnassus Ave, San Francisco, CA".to_string(),
            lat: 37.7632,
            lng: -122.4583,
        },
        HealthcareResource {
            name: "SF General Hospital".to_string(),
            resource_type: ResourceType::EmergencyRoom,
            distance_miles: 3.2,
            wait_time_range: "60-90 min".to_string(),
            phone: "(555) 456-7890".to_string(),
            address: "1001 Potrero Ave, San Francisco, CA".to_string(),
            lat: 37.7562,
            lng: -122.4041,
        },
        HealthcareResource {
            name: "Mission Bay Clinic".to_string(),
            resource_type: ResourceType::Clinic,
            distance_miles: 1.5,
            wait_time_range: "20-40 min".to_string(),
            phone: "(555) 234-5678".to_string(),
            address: "1825 4th St, San Francisco, CA".to_string(),
            lat: 37.7670,
            lng: -122.3892,
        },
    ]
}

pub fn allowed_types(urgency: UrgencyLevel) -> &'static [ResourceType] {
    match urgency {
        UrgencyLevel::High => &[ResourceType::EmergencyRoom, ResourceType::Hospital],
        UrgencyLevel::Moderate => &[
            ResourceType::UrgentCare,
            ResourceType::Hospital,
            ResourceType::EmergencyRoom,
        ],
        UrgencyLevel::Low => &[
            ResourceType::UrgentCare,
            ResourceType::Hospital,
            ResourceType::EmergencyRoom,
            ResourceType::Clinic,
        ],
    }
}

/// Filter the catalog by the urgency's allowed type set, sort ascending by
/// distance (stable, catalog order breaks ties), and keep the closest 3.
///
/// `location` is accepted but unused: real geolocation is out of scope and
/// the catalog carries static sample distances.
pub fn select_resources(
    catalog: &[HealthcareResource],
    _location: &str,
    urgency: UrgencyLevel,
) -> Vec<HealthcareResource> {
    let allowed = allowed_types(urgency);

    let mut matches: Vec<HealthcareResource> = catalog
        .iter()
        .filter(|resource| allowed.contains(&resource.resource_type))
        .cloned()
        .collect();

    matches.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    matches.truncate(3);
    matches
}
