use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

/// Jurisdiction metadata decoded from a plate string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateInfo {
    pub province: String,
    #[serde(rename = "vehicleType")]
    pub vehicle_type: String,
}

impl Default for PlateInfo {
    fn default() -> Self {
        Self {
            province: UNKNOWN.to_string(),
            vehicle_type: UNKNOWN.to_string(),
        }
    }
}

/// Registration province by the leading two-digit code.
static PROVINCES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("11", "Cao Bằng"),
        ("12", "Lạng Sơn"),
        ("14", "Quảng Ninh"),
        ("15", "Hải Phòng"),
        ("16", "Hải Phòng"),
        ("17", "Thái Bình"),
        ("18", "Nam Định"),
        ("19", "Phú Thọ"),
        ("20", "Thái Nguyên"),
        ("21", "Yên Bái"),
        ("22", "Tuyên Quang"),
        ("23", "Hà Giang"),
        ("24", "Lào Cai"),
        ("25", "Lai Châu"),
        ("26", "Sơn La"),
        ("27", "Điện Biên"),
        ("28", "Hòa Bình"),
        ("29", "Hà Nội"),
        ("30", "Hà Nội"),
        ("31", "Hà Nội"),
        ("32", "Hà Nội"),
        ("33", "Hà Nội"),
        ("34", "Hải Dương"),
        ("35", "Ninh Bình"),
        ("36", "Thanh Hóa"),
        ("37", "Nghệ An"),
        ("38", "Hà Tĩnh"),
        ("40", "Hà Nội"),
        ("43", "Đà Nẵng"),
        ("47", "Đắk Lắk"),
        ("48", "Đắk Nông"),
        ("49", "Lâm Đồng"),
        ("50", "TPHCM"),
        ("51", "TPHCM"),
        ("52", "TPHCM"),
        ("53", "TPHCM"),
        ("54", "TPHCM"),
        ("55", "TPHCM"),
        ("56", "TPHCM"),
        ("57", "TPHCM"),
        ("58", "TPHCM"),
        ("59", "TPHCM"),
        ("60", "Đồng Nai"),
        ("61", "Bình Dương"),
        ("62", "Long An"),
        ("63", "Tiền Giang"),
        ("64", "Vĩnh Long"),
        ("65", "Cần Thơ"),
        ("66", "Đồng Tháp"),
        ("67", "An Giang"),
        ("68", "Kiên Giang"),
        ("69", "Cà Mau"),
        ("70", "Tây Ninh"),
        ("71", "Bến Tre"),
        ("72", "Bà Rịa - Vũng Tàu"),
        ("73", "Quảng Bình"),
        ("74", "Quảng Trị"),
        ("75", "Thừa Thiên Huế"),
        ("76", "Quảng Ngãi"),
        ("77", "Bình Định"),
        ("78", "Phú Yên"),
        ("79", "Khánh Hòa"),
        ("81", "Gia Lai"),
        ("82", "Kon Tum"),
        ("83", "Sóc Trăng"),
        ("84", "Trà Vinh"),
        ("85", "Ninh Thuận"),
        ("86", "Bình Thuận"),
        ("88", "Vĩnh Phúc"),
        ("89", "Hưng Yên"),
        ("90", "Hà Nam"),
        ("92", "Quảng Nam"),
        ("93", "Bình Phước"),
        ("94", "Bạc Liêu"),
        ("95", "Hậu Giang"),
        ("97", "Bắc Kạn"),
        ("98", "Bắc Giang"),
        ("99", "Bắc Ninh"),
    ])
});

/// Registrant category by the series letter.
static SERIES: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('A', "Quân đội"),
        ('B', "Công an"),
        ('C', "Chính phủ"),
        ('D', "Cá nhân"),
        ('E', "Cá nhân"),
        ('F', "Doanh nghiệp"),
        ('G', "Cá nhân"),
        ('H', "Doanh nghiệp"),
        ('K', "Cơ quan"),
        ('L', "Cá nhân"),
        ('M', "Cá nhân"),
        ('N', "Cá nhân"),
        ('P', "Cá nhân"),
        ('S', "Cá nhân"),
        ('T', "Cá nhân"),
        ('U', "Cá nhân"),
        ('V', "Cá nhân"),
        ('X', "Xe máy"),
        ('Y', "Cá nhân"),
        ('Z', "Cá nhân"),
    ])
});

/// Decodes province and registrant category from a finished plate string.
///
/// The province code is the run of exactly two decimal digits at the very
/// start of the string; the series code is the first ASCII uppercase letter
/// anywhere in it. The two lookups are independent, and any code that is
/// absent or not in its table resolves to `"Unknown"`. This never fails.
pub fn decode(plate: &str) -> PlateInfo {
    let plate = plate.trim().to_uppercase();
    if plate.is_empty() {
        return PlateInfo::default();
    }

    let mut info = PlateInfo::default();

    let digits: Vec<char> = plate.chars().take(2).collect();
    if digits.len() == 2 && digits.iter().all(|c| c.is_ascii_digit()) {
        let code: String = digits.iter().collect();
        if let Some(province) = PROVINCES.get(code.as_str()) {
            info.province = (*province).to_string();
        }
    }

    if let Some(series) = plate.chars().find(|c| c.is_ascii_uppercase()) {
        if let Some(vehicle_type) = SERIES.get(&series) {
            info.vehicle_type = (*vehicle_type).to_string();
        }
    }

    info
}
