use super::cars::{Availability, NewCar};

const GALLERY_INTERIOR: &str = "https://pixabay.com/get/g65c2f9646175917ae21805ab8769ff21cc6ce2e16e23a2b0e71e836a52e20c8374b24638beb6b07ef716a3e118159900bc18c17035dc1d13da6d65a91f399828_1280.jpg";
const GALLERY_DASH: &str = "https://pixabay.com/get/gf04db82b17505a3f5936afb820726f6cdbab92523fdd20a3164b9e84f2893f3649fe07f7a5eedc2399d34c5dfee451da5a0e918460e29f5732dba882b8c2b1b3_1280.jpg";

fn strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|s| s.to_string()).collect()
}

fn gallery(photo: &str) -> Vec<String> {
	let base = "https://images.unsplash.com/";
	vec![
		format!("{}{}?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400&q=80", base, photo),
		format!("{}{}?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&h=675&q=80", base, photo),
		GALLERY_INTERIOR.to_string(),
		GALLERY_DASH.to_string(),
	]
}

const SEDAN_FEATURES: [&str; 6] = [
	"Bluetooth Connection",
	"Navigation System",
	"Leather Seats",
	"Climate Control",
	"Parking Sensors",
	"Reverse Camera",
];

/// The fleet every fresh store starts with.
pub fn sample_cars() -> Vec<NewCar> {
	vec![
		NewCar {
			name: "Mercedes-Benz E-Class".into(),
			car_type: "Luxury Sedan".into(),
			price: 75,
			year: 2023,
			fuel_type: "Diesel".into(),
			transmission: "Automatic".into(),
			seats: 5,
			doors: 4,
			luggage: 3,
			features: strings(&SEDAN_FEATURES),
			description: "The Mercedes-Benz E-Class is an elegant luxury sedan that offers exceptional comfort and advanced technology. Perfect for business trips or special occasions.".into(),
			availability: Availability::Available,
			images: gallery("photo-1603584173870-7f23fdae1b7a"),
		},
		NewCar {
			name: "Toyota RAV4".into(),
			car_type: "SUV".into(),
			price: 65,
			year: 2023,
			fuel_type: "Hybrid".into(),
			transmission: "Automatic".into(),
			seats: 5,
			doors: 5,
			luggage: 4,
			features: strings(&[
				"Bluetooth Connection",
				"Apple CarPlay",
				"Android Auto",
				"Backup Camera",
				"Cruise Control",
				"Lane Departure Warning",
			]),
			description: "The Toyota RAV4 offers a perfect blend of comfort, practicality, and efficiency with its hybrid powertrain. Ideal for family trips or outdoor adventures.".into(),
			availability: Availability::Available,
			images: gallery("photo-1533473359331-0135ef1b58bf"),
		},
		NewCar {
			name: "BMW 3 Series".into(),
			car_type: "Sport Sedan".into(),
			price: 70,
			year: 2023,
			fuel_type: "Petrol".into(),
			transmission: "Automatic".into(),
			seats: 5,
			doors: 4,
			luggage: 3,
			features: strings(&SEDAN_FEATURES),
			description: "The BMW 3 Series is the embodiment of a sporty sedan. With its powerful engine, responsive handling, and premium interior, it's an ideal choice for those who want both luxury and driving pleasure.".into(),
			availability: Availability::Available,
			images: gallery("photo-1580273916550-e323be2ae537"),
		},
		NewCar {
			name: "Volkswagen Golf GTI".into(),
			car_type: "Hatchback".into(),
			price: 55,
			year: 2023,
			fuel_type: "Petrol".into(),
			transmission: "Manual".into(),
			seats: 5,
			doors: 5,
			luggage: 2,
			features: strings(&[
				"Bluetooth Connection",
				"Apple CarPlay",
				"Android Auto",
				"Sport Seats",
				"Climate Control",
				"Rear View Camera",
			]),
			description: "The Volkswagen Golf GTI combines practicality with driving fun. Its responsive handling and turbocharged engine make every drive enjoyable.".into(),
			availability: Availability::Available,
			images: gallery("photo-1616422285623-13ff0162193c"),
		},
		NewCar {
			name: "Audi A6".into(),
			car_type: "Luxury Sedan".into(),
			price: 80,
			year: 2023,
			fuel_type: "Diesel".into(),
			transmission: "Automatic".into(),
			seats: 5,
			doors: 4,
			luggage: 3,
			features: strings(&SEDAN_FEATURES),
			description: "The Audi A6 is a premium luxury sedan featuring cutting-edge technology and elegant design. Perfect for corporate travel or luxury experiences.".into(),
			availability: Availability::Limited,
			images: gallery("photo-1603584173870-7f23fdae1b7a"),
		},
		NewCar {
			name: "Mazda MX-5 Miata".into(),
			car_type: "Convertible".into(),
			price: 85,
			year: 2023,
			fuel_type: "Petrol".into(),
			transmission: "Manual".into(),
			seats: 2,
			doors: 2,
			luggage: 1,
			features: strings(&[
				"Bluetooth Connection",
				"Leather Seats",
				"Climate Control",
				"Push Button Start",
				"Blind Spot Monitoring",
				"Lane Keeping Assist",
			]),
			description: "The Mazda MX-5 Miata offers pure driving joy with its convertible top and nimble handling. Perfect for scenic coastal roads and weekend getaways.".into(),
			availability: Availability::Unavailable,
			images: gallery("photo-1555626906-fcf10d6851b4"),
		},
	]
}
