use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use usbraw::{
    ControlSetup, Device, DeviceHandle, Transfer, TransferId, TransferStatus, CONTROL_SETUP_SIZE,
};

const GET_STRING: u16 = 0x03 << 8;

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();
    let path = std::env::args()
        .nth(1)
        .expect("usage: enumerate /dev/bus/usb/<bus>/<device>");

    let device = Arc::new(Device::open(&path).expect("Could not enumerate device"));
    println!("{}", device);
    #[cfg(feature = "serde")]
    println!("{}", serde_json::json!(device.descriptor()));

    let iproduct = device.descriptor().iproduct;
    if iproduct == 0 {
        return;
    }

    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let handle = DeviceHandle::open(Arc::clone(&device), move |_id: TransferId, transfer: Transfer| {
        let _ = tx.lock().unwrap().send(transfer);
    })
    .expect("Could not open device");

    // US English
    let setup = ControlSetup::new(0x80, 0x06, GET_STRING | iproduct as u16, 0x0409, 255);
    handle
        .submit(Transfer::control(setup, &[0; 255]))
        .expect("Could not submit transfer");
    let transfer = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("No completion");
    if let TransferStatus::Completed { transferred } = transfer.status() {
        let data = &transfer.buffer()[CONTROL_SETUP_SIZE..CONTROL_SETUP_SIZE + transferred];
        let utf16: Vec<u16> = data
            .get(2..)
            .unwrap_or(&[])
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        println!("Product: {}", String::from_utf16_lossy(&utf16));
    } else {
        println!("Product: ? ({:?})", transfer.status());
    }
}
