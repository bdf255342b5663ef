// FFI layouts mirror wlanapi.h, not every field is read
#![allow(dead_code)]

use core::{ffi::c_void, ptr};

use crate::{
    error::SignalError,
    sample::{Sample, Ssid},
    source::{SignalSource, SourceKind},
};

use super::{select_bss, BssEntry};

const ERROR_SUCCESS: u32 = 0;
const CLIENT_VERSION: u32 = 2;
const WLAN_INTF_OPCODE_CURRENT_CONNECTION: i32 = 7;
const DOT11_BSS_TYPE_INFRASTRUCTURE: i32 = 1;
const DOT11_SSID_MAX_LENGTH: usize = 32;

type Handle = *mut c_void;

#[repr(C)]
#[derive(Clone, Copy)]
struct Guid {
    data1: u32,
    data2: u16,
    data3: u16,
    data4: [u8; 8],
}

#[repr(C)]
struct WlanInterfaceInfo {
    interface_guid: Guid,
    description: [u16; 256],
    state: i32,
}

#[repr(C)]
struct WlanInterfaceInfoList {
    number_of_items: u32,
    index: u32,
    interface_info: [WlanInterfaceInfo; 1],
}

#[repr(C)]
#[derive(Clone, Copy)]
struct Dot11Ssid {
    length: u32,
    ssid: [u8; DOT11_SSID_MAX_LENGTH],
}

impl Dot11Ssid {
    fn as_bytes(&self) -> &[u8] {
        let len = core::cmp::min(self.length as usize, DOT11_SSID_MAX_LENGTH);
        &self.ssid[..len]
    }
}

#[repr(C)]
struct WlanAssociationAttributes {
    dot11_ssid: Dot11Ssid,
    bss_type: i32,
    bssid: [u8; 6],
    phy_type: i32,
    phy_index: u32,
    signal_quality: u32,
    rx_rate: u32,
    tx_rate: u32,
}

#[repr(C)]
struct WlanSecurityAttributes {
    security_enabled: i32,
    one_x_enabled: i32,
    auth_algorithm: i32,
    cipher_algorithm: i32,
}

#[repr(C)]
struct WlanConnectionAttributes {
    state: i32,
    connection_mode: i32,
    profile_name: [u16; 256],
    association: WlanAssociationAttributes,
    security: WlanSecurityAttributes,
}

#[repr(C)]
struct WlanRateSet {
    length: u32,
    rates: [u16; 126],
}

#[repr(C)]
struct WlanBssEntry {
    dot11_ssid: Dot11Ssid,
    phy_id: u32,
    bssid: [u8; 6],
    bss_type: i32,
    phy_type: i32,
    rssi: i32,
    link_quality: u32,
    in_reg_domain: u8,
    beacon_period: u16,
    timestamp: u64,
    host_timestamp: u64,
    capability_information: u16,
    ch_center_frequency: u32,
    rate_set: WlanRateSet,
    ie_offset: u32,
    ie_size: u32,
}

#[repr(C)]
struct WlanBssList {
    total_size: u32,
    number_of_items: u32,
    entries: [WlanBssEntry; 1],
}

#[link(name = "wlanapi")]
extern "system" {
    fn WlanOpenHandle(
        client_version: u32,
        reserved: *mut c_void,
        negotiated_version: *mut u32,
        client_handle: *mut Handle,
    ) -> u32;

    fn WlanCloseHandle(client_handle: Handle, reserved: *mut c_void) -> u32;

    fn WlanEnumInterfaces(
        client_handle: Handle,
        reserved: *mut c_void,
        interface_list: *mut *mut WlanInterfaceInfoList,
    ) -> u32;

    fn WlanQueryInterface(
        client_handle: Handle,
        interface_guid: *const Guid,
        opcode: i32,
        reserved: *mut c_void,
        data_size: *mut u32,
        data: *mut *mut c_void,
        opcode_value_type: *mut i32,
    ) -> u32;

    fn WlanGetNetworkBssList(
        client_handle: Handle,
        interface_guid: *const Guid,
        dot11_ssid: *const Dot11Ssid,
        bss_type: i32,
        security_enabled: i32,
        reserved: *mut c_void,
        bss_list: *mut *mut WlanBssList,
    ) -> u32;

    fn WlanFreeMemory(memory: *mut c_void);
}

fn check(call: &str, status: u32) -> Result<(), SignalError> {
    if status != ERROR_SUCCESS {
        return Err(SignalError::not_available(format!(
            "{} failed with error {}",
            call, status
        )));
    }

    Ok(())
}

/// Open client session, closed on drop
struct ClientHandle(Handle);

impl ClientHandle {
    fn open() -> Result<Self, SignalError> {
        let mut version = 0u32;
        let mut handle: Handle = ptr::null_mut();

        let status =
            unsafe { WlanOpenHandle(CLIENT_VERSION, ptr::null_mut(), &mut version, &mut handle) };
        check("WlanOpenHandle", status)?;

        Ok(Self(handle))
    }

    fn interfaces(&self) -> Result<WlanMemory<WlanInterfaceInfoList>, SignalError> {
        let mut list: *mut WlanInterfaceInfoList = ptr::null_mut();

        let status = unsafe { WlanEnumInterfaces(self.0, ptr::null_mut(), &mut list) };
        check("WlanEnumInterfaces", status)?;

        WlanMemory::new(list)
    }

    fn current_connection(
        &self,
        guid: &Guid,
    ) -> Result<WlanMemory<WlanConnectionAttributes>, SignalError> {
        let mut size = core::mem::size_of::<WlanConnectionAttributes>() as u32;
        let mut data: *mut c_void = ptr::null_mut();
        let mut value_type = 0i32;

        let status = unsafe {
            WlanQueryInterface(
                self.0,
                guid,
                WLAN_INTF_OPCODE_CURRENT_CONNECTION,
                ptr::null_mut(),
                &mut size,
                &mut data,
                &mut value_type,
            )
        };
        check("WlanQueryInterface", status)?;

        WlanMemory::new(data as *mut WlanConnectionAttributes)
    }

    fn bss_list(&self, guid: &Guid) -> Result<WlanMemory<WlanBssList>, SignalError> {
        let mut list: *mut WlanBssList = ptr::null_mut();

        let status = unsafe {
            WlanGetNetworkBssList(
                self.0,
                guid,
                ptr::null(),
                DOT11_BSS_TYPE_INFRASTRUCTURE,
                0,
                ptr::null_mut(),
                &mut list,
            )
        };
        check("WlanGetNetworkBssList", status)?;

        WlanMemory::new(list)
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        unsafe {
            WlanCloseHandle(self.0, ptr::null_mut());
        }
    }
}

/// Buffer allocated by the WLAN service, freed on drop
struct WlanMemory<T>(*mut T);

impl<T> WlanMemory<T> {
    fn new(ptr: *mut T) -> Result<Self, SignalError> {
        if ptr.is_null() {
            return Err(SignalError::not_available("WLAN service returned no data"));
        }

        Ok(Self(ptr))
    }

    fn get(&self) -> &T {
        // Non-null and owned until drop
        unsafe { &*self.0 }
    }
}

impl<T> Drop for WlanMemory<T> {
    fn drop(&mut self) {
        unsafe {
            WlanFreeMemory(self.0 as *mut c_void);
        }
    }
}

impl WlanMemory<WlanInterfaceInfoList> {
    fn items(&self) -> &[WlanInterfaceInfo] {
        let list = self.get();
        unsafe {
            core::slice::from_raw_parts(
                list.interface_info.as_ptr(),
                list.number_of_items as usize,
            )
        }
    }
}

impl WlanMemory<WlanBssList> {
    fn items(&self) -> &[WlanBssEntry] {
        let list = self.get();
        unsafe { core::slice::from_raw_parts(list.entries.as_ptr(), list.number_of_items as usize) }
    }
}

/// Reads RSSI of the associated network from the BSS list of the first
/// wireless interface
pub struct NativeSource;

impl NativeSource {
    pub fn new() -> Self {
        NativeSource
    }
}

impl Default for NativeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSource for NativeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Native
    }

    fn probe(&mut self) -> Result<(), SignalError> {
        let client = ClientHandle::open()?;
        let interfaces = client.interfaces()?;

        if interfaces.items().is_empty() {
            return Err(SignalError::not_available("no wireless interface found"));
        }

        log::debug!("found {} wireless interface(s)", interfaces.items().len());

        Ok(())
    }

    fn query(&mut self) -> Result<Sample, SignalError> {
        let client = ClientHandle::open()?;
        let interfaces = client.interfaces()?;

        let interface = interfaces
            .items()
            .first()
            .ok_or_else(|| SignalError::not_available("no wireless interface found"))?;

        let connection = client.current_connection(&interface.interface_guid)?;
        let association = &connection.get().association;
        let ssid = association.dot11_ssid.as_bytes();

        let bss_list = client.bss_list(&interface.interface_guid)?;
        let entries: Vec<BssEntry> = bss_list
            .items()
            .iter()
            .map(|entry| BssEntry {
                ssid: entry.dot11_ssid.as_bytes(),
                bssid: entry.bssid,
                rssi_dbm: entry.rssi,
                link_quality: entry.link_quality,
                frequency_khz: entry.ch_center_frequency,
            })
            .collect();

        let entry = select_bss(&entries, ssid, &association.bssid).ok_or_else(|| {
            SignalError::not_available("associated network not found in BSS list")
        })?;

        Ok(Sample::new(
            Ssid::new_from_slice(ssid),
            entry.rssi_dbm,
            core::cmp::min(entry.link_quality, 100) as u8,
            entry.frequency_khz,
        ))
    }
}
