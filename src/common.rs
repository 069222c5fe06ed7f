use serde::{Deserialize, Serialize};

// 公共数据结构
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// 浏览器上报的位置，定位失败时字段可能缺失或为 null
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct LocationInput {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl LocationInput {
    /// 经纬度都存在且在合法范围内时才视为有效位置
    pub fn to_coordinate(self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let coord = Coordinate::new(lat, lng);
                if coord.is_valid() {
                    Some(coord)
                } else {
                    tracing::warn!("Ignoring out-of-range location: {}, {}", lat, lng);
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_location_is_ignored() {
        let input = LocationInput {
            lat: Some(39.9),
            lng: None,
        };
        assert_eq!(input.to_coordinate(), None);
    }

    #[test]
    fn out_of_range_location_is_ignored() {
        let input = LocationInput {
            lat: Some(91.0),
            lng: Some(116.4),
        };
        assert_eq!(input.to_coordinate(), None);
    }

    #[test]
    fn complete_location_is_accepted() {
        let input = LocationInput {
            lat: Some(39.9),
            lng: Some(116.4),
        };
        assert_eq!(input.to_coordinate(), Some(Coordinate::new(39.9, 116.4)));
    }
}
