#[cfg(target_os = "windows")]
#[path = "platform_wlanapi.rs"]
mod platform_impl;

#[cfg(not(target_os = "windows"))]
#[path = "platform_dummy.rs"]
mod platform_impl;

pub use platform_impl::*;

/// View of one BSS entry from a scan list
#[derive(Debug, Clone, Copy)]
pub struct BssEntry<'a> {
    pub ssid: &'a [u8],
    pub bssid: [u8; 6],
    pub rssi_dbm: i32,
    pub link_quality: u32,
    pub frequency_khz: u32,
}

/// Pick the BSS entry of the associated network.
///
/// The entry with the associated BSSID wins. When the access point is not in
/// the list under that BSSID the first entry with the same SSID is used.
pub fn select_bss<'a, 'b>(
    entries: &'b [BssEntry<'a>],
    ssid: &[u8],
    bssid: &[u8; 6],
) -> Option<&'b BssEntry<'a>> {
    let mut same_ssid = entries.iter().filter(|entry| entry.ssid == ssid);

    let first = same_ssid.next()?;
    if first.bssid == *bssid {
        return Some(first);
    }

    Some(same_ssid.find(|entry| entry.bssid == *bssid).unwrap_or(first))
}
