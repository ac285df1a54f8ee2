use chrono::Local;
use log::info;

pub fn write_header() {
    info!("{: ^80}", "-----------------");
    info!("{: ^80}", "TBSCC");
    info!("{: ^80}", "-----------------");
    info!("{: ^80}", format!("version: {}", env!("CARGO_PKG_VERSION")));
    info!("{: ^80}", "");
    info!("{: ^80}", "::::::::::::::::::::::::::::::::::::::::::");
    info!("{: ^80}", "::  self-consistent charge tight-binding ::");
    info!("{: ^80}", "::::::::::::::::::::::::::::::::::::::::::");
    info!("{: ^80}", "");
    info!(
        "{: ^80}",
        format!("started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    );
    info!("{: ^80}", "");
}
