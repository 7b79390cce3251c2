use caldb_sync::catalog::extract_links;
use caldb_sync::domain::{BundleKey, MissionId, TelescopeId};

// Trimmed-down copy of the supported-missions page structure: one table row
// per instrument, tar-file anchors mixed with documentation links.
const SAMPLE_PAGE: &str = concat!(
    "<html><body>\n",
    "<tr><td>NuSTAR</td>\n",
    "<td><A HREF=\"https://heasarc.gsfc.nasa.gov/FTP/caldb/data/nustar/fpm/goodfiles_nustar_fpm.tar.gz\">Tar File</A></td></tr>\n",
    "<tr><td>Swift XRT</td>\n",
    "<td><a href=\"https://heasarc.gsfc.nasa.gov/FTP/caldb/data/swift/xrt/goodfiles_swift_xrt.tar.gz\" target=\"_blank\">tar file</a></td></tr>\n",
    "<tr><td>Swift UVOT</td>\n",
    "<td><a href=\"https://heasarc.gsfc.nasa.gov/FTP/caldb/data/swift/uvota/goodfiles_swift_uvota.tar.gz\">Tar file</a></td></tr>\n",
    "<tr><td>Docs</td>\n",
    "<td><a href=\"https://heasarc.gsfc.nasa.gov/docs/heasarc/caldb/caldb_wotsit.html\">release notes</a></td></tr>\n",
    "</body></html>\n",
);

fn key(mission: &str, telescope: &str) -> BundleKey {
    BundleKey {
        mission: MissionId::new(mission),
        telescope: TelescopeId::new(telescope),
    }
}

#[test]
fn one_entry_per_tar_file_anchor() {
    let links = extract_links(SAMPLE_PAGE).unwrap();
    assert_eq!(links.len(), 3);
    assert!(links.contains_key(&key("nustar", "fpm")));
    assert!(links.contains_key(&key("swift", "xrt")));
    assert!(links.contains_key(&key("swift", "uvota")));
}

#[test]
fn href_with_extra_attributes_yields_clean_url() {
    let links = extract_links(SAMPLE_PAGE).unwrap();
    let xrt = &links[&key("swift", "xrt")];
    assert_eq!(
        xrt.url,
        "https://heasarc.gsfc.nasa.gov/FTP/caldb/data/swift/xrt/goodfiles_swift_xrt.tar.gz"
    );
    assert_eq!(xrt.file_name(), "goodfiles_swift_xrt.tar.gz");
}

#[test]
fn empty_page_yields_empty_table() {
    let links = extract_links("<html></html>").unwrap();
    assert!(links.is_empty());
}
