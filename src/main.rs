use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{arg, ArgMatches, Command};

use rota_planner::customer::{load_customers, save_customers, Customer};
use rota_planner::geocode::{geocode_missing, NominatimClient, NominatimConfig};
use rota_planner::haversine::Haversine;
use rota_planner::logging::init_tracing;
use rota_planner::maps::directions_url;
use rota_planner::oracle::DistanceOracle;
use rota_planner::ors::{OrsClient, OrsConfig};
use rota_planner::osrm::{OsrmClient, OsrmConfig};
use rota_planner::traits::DistanceService;
use rota_planner::{plan, Point, RouteOptions};

const ROUTING_KEY_ENV: &str = "ROTA_ROUTING_API_KEY";

fn cli() -> Command {
    Command::new("rota-planner")
        .about("Orders customer visits and builds a map link")
        .arg_required_else_help(true)
        .arg(arg!(--"log-json" "Emit logs as JSON").global(true))
        .subcommand(
            Command::new("optimize")
                .about("Computes a visiting order for the selected customers")
                .arg(
                    arg!(--customers <PATH> "Customer list (JSON)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--select [IDS] "Comma-separated customer ids to visit (default: all)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--origin [LATLNG] "Starting point as lat,lng (default: first located customer)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"ors-key" [KEY] "OpenRouteService API key (or ROTA_ROUTING_API_KEY)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"ors-url" [URL] "OpenRouteService base url")
                        .value_parser(clap::value_parser!(String))
                        .conflicts_with("osrm-url"),
                )
                .arg(
                    arg!(--"osrm-url" [URL] "Use a self-hosted OSRM instead of OpenRouteService")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"max-passes" [N] "Cap on 2-opt passes per neighborhood")
                        .default_value("50")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(arg!(--"no-clusters" "Order all customers as one group")),
        )
        .subcommand(
            Command::new("geocode")
                .about("Fills missing coordinates through Nominatim, saving in place")
                .arg(
                    arg!(--customers <PATH> "Customer list (JSON)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"))?;

    match matches.subcommand() {
        Some(("optimize", sub)) => optimize(sub),
        Some(("geocode", sub)) => geocode(sub),
        _ => Err(anyhow!("Invalid subcommand")),
    }
}

fn optimize(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<PathBuf>("customers")
        .ok_or_else(|| anyhow!("--customers is required"))?;
    let customers = select(load_customers(path)?, matches.get_one::<String>("select"))?;

    let origin = matches
        .get_one::<String>("origin")
        .map(|raw| raw.parse::<Point>())
        .transpose()?;

    let options = RouteOptions {
        max_two_opt_passes: *matches.get_one::<usize>("max-passes").unwrap_or(&50),
        cluster_by_locality: !matches.get_flag("no-clusters"),
    };

    let env_key = std::env::var(ROUTING_KEY_ENV).ok();
    match backend(matches, env_key)? {
        Backend::Osrm(config) => report(customers, origin, OsrmClient::new(config)?, &options),
        Backend::Ors(config) => report(customers, origin, OrsClient::new(config)?, &options),
        Backend::StraightLine => {
            tracing::warn!("no routing API key, ordering by straight-line distance");
            report(customers, origin, Haversine, &options)
        }
    }
}

#[derive(Debug)]
enum Backend {
    Osrm(OsrmConfig),
    Ors(OrsConfig),
    StraightLine,
}

fn backend(matches: &ArgMatches, env_key: Option<String>) -> Result<Backend> {
    if let Some(base_url) = matches.get_one::<String>("osrm-url") {
        return Ok(Backend::Osrm(OsrmConfig {
            base_url: base_url.clone(),
            ..OsrmConfig::default()
        }));
    }

    let api_key = matches
        .get_one::<String>("ors-key")
        .cloned()
        .or(env_key)
        .filter(|key| !key.trim().is_empty());
    let base_url = matches.get_one::<String>("ors-url");

    match (api_key, base_url) {
        (Some(api_key), base_url) => {
            let mut config = OrsConfig {
                api_key: Some(api_key),
                ..OrsConfig::default()
            };
            if let Some(base_url) = base_url {
                config.base_url = base_url.clone();
            }
            Ok(Backend::Ors(config))
        }
        (None, Some(_)) => Err(anyhow!(
            "--ors-url needs an API key (--ors-key or {ROUTING_KEY_ENV})"
        )),
        (None, None) => Ok(Backend::StraightLine),
    }
}

fn select(customers: Vec<Customer>, ids: Option<&String>) -> Result<Vec<Customer>> {
    let Some(ids) = ids else {
        return Ok(customers);
    };
    let wanted: Vec<&str> = ids.split(',').map(str::trim).filter(|id| !id.is_empty()).collect();
    let selected: Vec<Customer> = customers
        .into_iter()
        .filter(|customer| wanted.contains(&customer.id.as_str()))
        .collect();
    if selected.is_empty() {
        return Err(anyhow!("none of the selected ids exist in the customer list"));
    }
    Ok(selected)
}

fn report<S: DistanceService>(
    customers: Vec<Customer>,
    origin: Option<Point>,
    service: S,
    options: &RouteOptions,
) -> Result<()> {
    let mut oracle = DistanceOracle::new(service);
    let route = plan(origin, customers, &mut oracle, options);

    for (position, customer) in route.order.iter().enumerate() {
        let marker = if position < route.locatable { "" } else { " (no coordinates)" };
        println!("{:>3}. {} - {}{}", position + 1, customer.name, customer.address, marker);
    }
    println!("Estimated distance: {:.1} km", route.total_km);
    println!("{}", directions_url(origin, &route.order)?);
    Ok(())
}

fn geocode(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<PathBuf>("customers")
        .ok_or_else(|| anyhow!("--customers is required"))?;
    let mut customers = load_customers(path)?;
    let mut geocoder = NominatimClient::new(NominatimConfig::default())?;

    let report = geocode_missing(&mut customers, &mut geocoder, |current, total, address| {
        eprintln!("[{current}/{total}] {address}");
    });
    save_customers(path, &customers)?;

    println!(
        "Geocoded {} of {} customers ({} not found)",
        report.succeeded, report.attempted, report.failed
    );
    Ok(())
}
