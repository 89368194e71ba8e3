use air_quality::columns::{
    COL_DAY, COL_HOUR, COL_MONTH, COL_PM10, COL_PM25, COL_RAIN, COL_STATION, COL_TEMP, COL_YEAR,
    PARTICULATES, WEATHER_POLLUTION_COLUMNS,
};
use air_quality::{
    apply_selection, correlation_matrix, extremes_by_station, monthly_average, normalize,
    parse_csv, CsvOptions, Season,
};
use chrono::{Datelike, Duration, NaiveDate, Timelike};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polars::prelude::*;

/// A year of hourly readings for a handful of stations.
fn synthetic_year() -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2014, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let stations = ["Aotizhongxin", "Changping", "Dingling", "Dongsi"];
    let hours = 365 * 24;

    let mut columns: [Vec<i64>; 4] = Default::default();
    let mut names = Vec::new();
    let mut pm25 = Vec::new();
    let mut pm10 = Vec::new();
    let mut temp = Vec::new();
    let mut rain = Vec::new();
    for (idx, station) in stations.iter().enumerate() {
        for offset in 0..hours {
            let at = start + Duration::hours(offset);
            columns[0].push(at.year() as i64);
            columns[1].push(at.month() as i64);
            columns[2].push(at.day() as i64);
            columns[3].push(at.hour() as i64);
            names.push(*station);
            let wave = ((offset + idx as i64 * 5) % 24) as f64;
            pm25.push((offset % 17 != 0).then_some(20.0 + wave * 3.0));
            pm10.push(Some(40.0 + wave * 4.0));
            temp.push(Some(-5.0 + wave));
            rain.push(Some((offset % 31) as f64 / 10.0));
        }
    }
    let [years, months, days, hours] = columns;
    DataFrame::new(vec![
        Column::new(COL_YEAR.into(), years),
        Column::new(COL_MONTH.into(), months),
        Column::new(COL_DAY.into(), days),
        Column::new(COL_HOUR.into(), hours),
        Column::new(COL_STATION.into(), names),
        Column::new(COL_PM25.into(), pm25),
        Column::new(COL_PM10.into(), pm10),
        Column::new(COL_TEMP.into(), temp),
        Column::new(COL_RAIN.into(), rain),
        Column::new("WSPM".into(), vec![1.5f64; stations.len() * 365 * 24]),
        Column::new("PRES".into(), vec![1012.0f64; stations.len() * 365 * 24]),
    ])
    .unwrap()
}

fn to_csv(df: &mut DataFrame) -> Vec<u8> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer).finish(df).unwrap();
    buffer
}

fn bench_pipeline(c: &mut Criterion) {
    let mut raw = synthetic_year();
    let csv = to_csv(&mut raw);
    let options = CsvOptions::default();
    let table = normalize(raw.clone()).unwrap();
    let df = table.frame();
    let selection = table
        .full_selection()
        .unwrap()
        .with_stations(["Changping", "Dongsi"])
        .with_seasons([Season::Winter]);

    c.bench_function("parse_csv", |b| {
        b.iter(|| parse_csv(black_box(csv.clone()), "bench", &options))
    });
    c.bench_function("normalize", |b| b.iter(|| normalize(black_box(raw.clone()))));
    c.bench_function("monthly_average", |b| {
        b.iter(|| monthly_average(black_box(df), &PARTICULATES))
    });
    c.bench_function("correlation_matrix", |b| {
        b.iter(|| correlation_matrix(black_box(df), &WEATHER_POLLUTION_COLUMNS))
    });
    c.bench_function("extremes_by_station", |b| {
        b.iter(|| extremes_by_station(black_box(df), COL_RAIN))
    });
    c.bench_function("apply_selection", |b| {
        b.iter(|| apply_selection(black_box(df), &selection))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
