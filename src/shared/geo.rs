use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

impl Add for Distance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, distance| acc + distance)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const fn from_seconds(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes * 60)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0 / 60
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, duration| acc + duration)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    /// Formats as `lat,lng`, the waypoint format the directions endpoint takes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{},{}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(value: (f64, f64)) -> Self {
        Self {
            latitude: value.0,
            longitude: value.1,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl Coordinate {
    /// Drawing surfaces take the axis order flipped.
    pub const fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

#[test]
fn coordinate_display_test() {
    let coordinate = Coordinate::from((43.65, -79.38));
    assert_eq!(coordinate.to_string(), "43.65,-79.38")
}

#[test]
fn coordinate_lng_lat_test() {
    let coordinate = Coordinate::from((43.65, -79.38));
    assert_eq!(coordinate.lng_lat(), [-79.38, 43.65])
}

#[test]
fn distance_sum_test() {
    let legs = [Distance::from_meters(1200.0), Distance::from_kilometers(1.8)];
    let total: Distance = legs.into_iter().sum();
    assert_eq!(total, Distance::from_kilometers(3.0))
}

#[test]
fn duration_sum_test() {
    let legs = [Duration::from_seconds(90), Duration::from_minutes(2)];
    let total: Duration = legs.into_iter().sum();
    assert_eq!(total.as_seconds(), 210)
}
