use tracing::{error, info, warn};
use waypost::{
    backend::Backend,
    directions::Directions,
    entry::MarkerEntry,
    map::{Geocoder, ReverseGeocode},
    trip::{AddOutcome, Planner, TripState},
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        usage();
    }
    let base_url = args[1].as_str();

    let backend = Backend::new(base_url);
    info!("Waiting for backend...");
    backend.wait_until_ready().await;

    let command = args.get(2).map(String::as_str);
    if command == Some("probe") {
        let (Some(lng), Some(lat)) = (args.get(3), args.get(4)) else {
            usage();
        };
        let (Ok(lng), Ok(lat)) = (lng.parse::<f64>(), lat.parse::<f64>()) else {
            error!("probe takes numeric <lng> <lat>");
            std::process::exit(1);
        };
        probe(&backend, lng, lat).await;
        return;
    }

    let directions = Directions::new(base_url);
    let mut planner = Planner::new(directions, backend);
    if let Err(err) = planner.load().await {
        error!("Could not load trip: {err}");
        std::process::exit(1);
    }

    match command {
        None => {}
        Some("add") => {
            let Some(address) = args.get(3) else {
                usage();
            };
            let mut entry = MarkerEntry::new();
            entry.set_field(address.as_str());
            let marker = match entry.submit(None) {
                Ok(marker) => marker,
                Err(err) => {
                    error!("{err}");
                    std::process::exit(1);
                }
            };
            match planner.add_stop(marker).await {
                Ok(AddOutcome::Added) => info!("Added {address}"),
                Ok(AddOutcome::Rejected { address, reason }) => {
                    warn!("{address} was rejected: {reason}")
                }
                Err(err) => {
                    error!("Could not add stop: {err}");
                    std::process::exit(1);
                }
            }
        }
        Some("delete") => {
            let Some(address) = args.get(3) else {
                usage();
            };
            if let Err(err) = planner.delete_stop(address).await {
                error!("Could not delete stop: {err}");
                std::process::exit(1);
            }
        }
        Some("start") => {
            let Some(address) = args.get(3) else {
                usage();
            };
            planner.reorder_by_start(address).await;
        }
        Some(other) => {
            error!("Unknown command: {other}");
            usage();
        }
    }

    print_trip(planner.trip());
}

async fn probe(backend: &Backend, lng: f64, lat: f64) {
    let token = match backend.mapbox_token().await {
        Ok(token) => token,
        Err(err) => {
            error!("Could not fetch map token: {err}");
            std::process::exit(1);
        }
    };
    let geocoder = Geocoder::new(token);
    match geocoder.reverse(lng, lat).await {
        Some(address) => println!("{address}"),
        None => println!("Unknown address"),
    }
}

fn print_trip(trip: &TripState) {
    println!("Trip ({:?})", trip.phase());
    for (i, stop) in trip.stops().iter().enumerate() {
        println!("{}. {}", i + 1, stop.address);
    }
    if let Some(route) = trip.route() {
        println!(
            "Total: {:.2} km, {} min",
            route.distance.as_kilometers(),
            route.duration.as_minutes()
        );
    }
    match trip.current_leg() {
        Some(leg) => {
            println!("From {} to {}:", leg.start, leg.end);
            for step in &leg.steps {
                println!("  {} ({}, {})", step.instruction, step.distance, step.duration);
            }
        }
        None => println!("No instructions available."),
    }
}

fn usage() -> ! {
    error!(
        "Usage: waypost-cli <base-url> [add <address> | delete <address> | start <address> | probe <lng> <lat>]"
    );
    std::process::exit(1);
}
