use serde::{Deserialize, Serialize};

/// Column header of the flat file, in output order
pub const HEADER: [&str; 13] = [
    "Nama Kecamatan",
    "NPSN",
    "Nama Sekolah",
    "Alamat",
    "Desa/Kelurahan",
    "Kecamatan/Kota (LN)",
    "Kab.-Kota/Negara (LN)",
    "Propinsi/Luar Negeri (LN)",
    "Status Sekolah",
    "Bentuk Pendidikan",
    "Jenjang Pendidikan",
    "Lintang",
    "Bujur",
];

/// Columns the dashboard cannot work without
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Nama Kecamatan",
    "NPSN",
    "Nama Sekolah",
    "Bentuk Pendidikan",
    "Lintang",
    "Bujur",
];

/// Labels of the identity table on a school detail page, in output order
pub const IDENTITY_LABELS: [&str; 8] = [
    "Alamat",
    "Desa/Kelurahan",
    "Kecamatan/Kota (LN)",
    "Kab.-Kota/Negara (LN)",
    "Propinsi/Luar Negeri (LN)",
    "Status Sekolah",
    "Bentuk Pendidikan",
    "Jenjang Pendidikan",
];

/// One raw row of the flat file, exactly as harvested.
///
/// Field order matches [`HEADER`]; the CSV writer relies on it when
/// serializing without headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    #[serde(rename = "Nama Kecamatan")]
    pub subdistrict: String,
    #[serde(rename = "NPSN")]
    pub npsn: String,
    #[serde(rename = "Nama Sekolah")]
    pub name: String,
    #[serde(rename = "Alamat", default)]
    pub address: String,
    #[serde(rename = "Desa/Kelurahan", default)]
    pub village: String,
    #[serde(rename = "Kecamatan/Kota (LN)", default)]
    pub foreign_district: String,
    #[serde(rename = "Kab.-Kota/Negara (LN)", default)]
    pub foreign_city: String,
    #[serde(rename = "Propinsi/Luar Negeri (LN)", default)]
    pub foreign_province: String,
    #[serde(rename = "Status Sekolah", default)]
    pub status: String,
    #[serde(rename = "Bentuk Pendidikan")]
    pub form: String,
    #[serde(rename = "Jenjang Pendidikan", default)]
    pub level: String,
    #[serde(rename = "Lintang")]
    pub latitude: String,
    #[serde(rename = "Bujur")]
    pub longitude: String,
}

impl SchoolRecord {
    /// Fill the identity fields from a label lookup; missing labels become empty
    pub fn set_identity<'a>(&mut self, lookup: impl Fn(&str) -> Option<&'a str>) {
        let get = |label: &str| lookup(label).unwrap_or_default().to_string();
        self.address = get("Alamat");
        self.village = get("Desa/Kelurahan");
        self.foreign_district = get("Kecamatan/Kota (LN)");
        self.foreign_city = get("Kab.-Kota/Negara (LN)");
        self.foreign_province = get("Propinsi/Luar Negeri (LN)");
        self.status = get("Status Sekolah");
        self.form = get("Bentuk Pendidikan");
        self.level = get("Jenjang Pendidikan");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_required_columns_are_in_header() {
        for col in REQUIRED_COLUMNS {
            assert!(HEADER.contains(col), "{} missing from header", col);
        }
    }

    #[test]
    fn test_identity_labels_are_in_header() {
        for label in IDENTITY_LABELS {
            assert!(HEADER.contains(&label));
        }
    }

    #[test]
    fn test_set_identity_defaults_missing_to_empty() {
        let fields: HashMap<&str, &str> =
            [("Alamat", "Jl. Raya Banjaran"), ("Bentuk Pendidikan", "SD")].into();

        let mut record = SchoolRecord::default();
        record.set_identity(|label| fields.get(label).copied());

        assert_eq!(record.address, "Jl. Raya Banjaran");
        assert_eq!(record.form, "SD");
        assert_eq!(record.village, "");
        assert_eq!(record.status, "");
    }
}
