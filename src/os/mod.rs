pub mod usb_raw;
