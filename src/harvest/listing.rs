//! Listing pages: the regency page (one row per subdistrict) and the
//! subdistrict page (one row per school).

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::client::resolve_link;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

#[derive(Debug, Clone, PartialEq)]
pub struct SubdistrictLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchoolLink {
    pub npsn: String,
    pub name: String,
    pub url: String,
}

pub(crate) fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Cells of every data row of the first table; the header row is skipped
fn data_rows(document: &Html) -> Vec<Vec<ElementRef<'_>>> {
    let Some(table) = document.select(&TABLE).next() else {
        return Vec::new();
    };
    table
        .select(&ROW)
        .skip(1)
        .map(|row| row.select(&CELL).collect())
        .collect()
}

/// Resolve a row's link; a row whose href cannot be resolved is skipped
fn row_link(base: &Url, href: &str) -> Option<String> {
    match resolve_link(base, href) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!("Skipping row: {:#}", e);
            None
        }
    }
}

/// Extract (subdistrict, link) pairs. A page without a table yields nothing.
pub fn parse_subdistricts(html: &str, base: &Url) -> Vec<SubdistrictLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for cells in data_rows(&document) {
        if cells.len() < 2 {
            continue;
        }
        let Some(anchor) = cells[1].select(&LINK).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = row_link(base, href) else {
            continue;
        };
        links.push(SubdistrictLink {
            name: cell_text(&cells[1]),
            url,
        });
    }

    links
}

/// Extract the schools of one subdistrict page. Column 2 carries the NPSN
/// link to the detail page, column 3 the school name.
pub fn parse_schools(html: &str, base: &Url) -> Vec<SchoolLink> {
    let document = Html::parse_document(html);
    let mut schools = Vec::new();

    for cells in data_rows(&document) {
        if cells.len() < 3 {
            continue;
        }
        let Some(anchor) = cells[1].select(&LINK).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = row_link(base, href) else {
            continue;
        };
        schools.push(SchoolLink {
            npsn: cell_text(&anchor),
            name: cell_text(&cells[2]),
            url,
        });
    }

    schools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://referensi.data.kemendikdasmen.go.id").unwrap()
    }

    #[test]
    fn test_parse_subdistricts() {
        let html = r#"
            <table>
              <tr><th>No</th><th>Wilayah</th><th>Total</th></tr>
              <tr><td>1</td><td><a href="/pendidikan/dikdas/020801/3/all/all/all"> Kec. Ciwidey </a></td><td>60</td></tr>
              <tr><td>2</td><td>Kec. Tanpa Link</td><td>10</td></tr>
              <tr><td>only one cell</td></tr>
              <tr><td>3</td><td><a href="https://other.host/x">Kec. Pasirjambu</a></td></tr>
            </table>"#;

        let links = parse_subdistricts(html, &base());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].name, "Kec. Ciwidey");
        assert_eq!(
            links[0].url,
            "https://referensi.data.kemendikdasmen.go.id/pendidikan/dikdas/020801/3/all/all/all"
        );
        assert_eq!(links[1].url, "https://other.host/x");
    }

    #[test]
    fn test_missing_table_is_empty() {
        let links = parse_subdistricts("<html><body><p>maintenance</p></body></html>", &base());
        assert!(links.is_empty());
        assert!(parse_schools("", &base()).is_empty());
    }

    #[test]
    fn test_parse_schools() {
        let html = r#"
            <table>
              <thead><tr><th>No</th><th>NPSN</th><th>Nama</th></tr></thead>
              <tbody>
                <tr><td>1</td><td><a href="/tabs.php?npsn=20206001">20206001</a></td><td>SDN 1 CIWIDEY</td></tr>
                <tr><td>2</td><td>20206002</td><td>SD TANPA LINK</td></tr>
                <tr><td>3</td><td><a href="/tabs.php?npsn=20206003">20206003</a></td></tr>
              </tbody>
            </table>"#;

        let schools = parse_schools(html, &base());
        assert_eq!(
            schools,
            vec![SchoolLink {
                npsn: "20206001".to_string(),
                name: "SDN 1 CIWIDEY".to_string(),
                url: "https://referensi.data.kemendikdasmen.go.id/tabs.php?npsn=20206001".to_string(),
            }]
        );
    }

    #[test]
    fn test_unresolvable_href_skips_row() {
        let html = r#"
            <table>
              <tr><th>No</th><th>Wilayah</th></tr>
              <tr><td>1</td><td><a href="http://">Kec. Rusak</a></td></tr>
              <tr><td>2</td><td><a href="/pendidikan/dikdas/020802/3/all/all/all">Kec. Rancabali</a></td></tr>
            </table>"#;

        let links = parse_subdistricts(html, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Kec. Rancabali");

        let schools = r#"
            <table>
              <tr><th>No</th><th>NPSN</th><th>Nama</th></tr>
              <tr><td>1</td><td><a href="http://">1</a></td><td>SD RUSAK</td></tr>
              <tr><td>2</td><td><a href="/tabs.php?npsn=2">2</a></td><td>SD BAIK</td></tr>
            </table>"#;
        let schools = parse_schools(schools, &base());
        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].name, "SD BAIK");
    }
}
