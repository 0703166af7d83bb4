//! Direct USB transport speaking ESC/POS to the printer.
//!
//! The device is opened fresh for every strip and released afterwards, so
//! a printer that is unplugged mid-run only fails the strips dispatched
//! while it is absent.

use std::path::Path;
use std::time::Duration;

use rusb::{Context, Device, DeviceDescriptor, DeviceHandle, Direction, TransferType, UsbContext};
use tracing::{debug, info};

use crate::transport::StripTransport;
use crate::{PrinterError, Result, escpos};

/// Default USB vendor id (Epson).
pub const DEFAULT_VENDOR_ID: u16 = 0x04b8;

/// Default USB product id (TM-T88 family).
pub const DEFAULT_PRODUCT_ID: u16 = 0x0202;

const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    config: u8,
    iface: u8,
    setting: u8,
    address: u8,
}

/// Transport that claims the printer over USB and sends raw ESC/POS.
#[derive(Debug, Clone)]
pub struct UsbPrinter {
    vendor_id: u16,
    product_id: u16,
}

impl UsbPrinter {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }

    fn open_device(
        &self,
        context: &Context,
    ) -> Result<(Device<Context>, DeviceDescriptor, DeviceHandle<Context>)> {
        for device in context.devices()?.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(d) => d,
                Err(err) => {
                    debug!(?err, "Skipping unreadable device descriptor");
                    continue;
                }
            };
            if descriptor.vendor_id() == self.vendor_id
                && descriptor.product_id() == self.product_id
            {
                let handle = device.open()?;
                return Ok((device, descriptor, handle));
            }
        }
        Err(PrinterError::DeviceUnavailable {
            vendor_id: self.vendor_id,
            product_id: self.product_id,
        })
    }

    fn find_bulk_out(device: &Device<Context>, descriptor: &DeviceDescriptor) -> Option<Endpoint> {
        for n in 0..descriptor.num_configurations() {
            let Ok(config) = device.config_descriptor(n) else {
                continue;
            };
            for interface in config.interfaces() {
                for interface_desc in interface.descriptors() {
                    for endpoint in interface_desc.endpoint_descriptors() {
                        if endpoint.direction() == Direction::Out
                            && endpoint.transfer_type() == TransferType::Bulk
                        {
                            return Some(Endpoint {
                                config: config.number(),
                                iface: interface_desc.interface_number(),
                                setting: interface_desc.setting_number(),
                                address: endpoint.address(),
                            });
                        }
                    }
                }
            }
        }
        None
    }

    fn write_all(
        handle: &DeviceHandle<Context>,
        endpoint: u8,
        payload: &[u8],
    ) -> Result<()> {
        let mut written = 0;
        while written < payload.len() {
            written += handle.write_bulk(endpoint, &payload[written..], WRITE_TIMEOUT)?;
        }
        Ok(())
    }
}

impl StripTransport for UsbPrinter {
    fn name(&self) -> &str {
        "usb"
    }

    fn send(&mut self, strip: &Path) -> Result<()> {
        let img = image::open(strip)?.into_luma8();

        let context = Context::new()?;
        let (device, descriptor, mut handle) = self.open_device(&context)?;
        let endpoint =
            Self::find_bulk_out(&device, &descriptor).ok_or(PrinterError::MissingEndpoint)?;

        // Kernel driver detach is unsupported on some platforms; claiming
        // the interface will surface any real conflict.
        if let Err(err) = handle.set_auto_detach_kernel_driver(true) {
            debug!(?err, "Kernel driver auto-detach not available");
        }
        handle.set_active_configuration(endpoint.config)?;
        handle.claim_interface(endpoint.iface)?;
        handle.set_alternate_setting(endpoint.iface, endpoint.setting)?;

        let mut payload = escpos::init();
        payload.extend(escpos::raster_image(&img));
        payload.extend(escpos::cut());

        debug!(
            strip = %strip.display(),
            bytes = payload.len(),
            endpoint = endpoint.address,
            "Writing ESC/POS payload"
        );
        let result = Self::write_all(&handle, endpoint.address, &payload);
        handle.release_interface(endpoint.iface).ok();
        result?;

        info!(strip = %strip.display(), "Strip sent to USB printer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids_match_epson_tm_family() {
        let printer = UsbPrinter::new(DEFAULT_VENDOR_ID, DEFAULT_PRODUCT_ID);
        assert_eq!(printer.vendor_id, 0x04b8);
        assert_eq!(printer.product_id, 0x0202);
        assert_eq!(printer.name(), "usb");
    }

    #[test]
    fn test_missing_strip_file_fails_before_usb() {
        // Image decode happens before any device access, so a bad path
        // fails with an image error even with no printer attached.
        let mut printer = UsbPrinter::new(0xffff, 0xffff);
        let err = printer.send(Path::new("/nonexistent/strip.png")).unwrap_err();
        assert!(matches!(err, PrinterError::Image(_)));
    }
}
