// Two-stage frame pipeline: a capture stage fills pooled frames and ships
// them as wire records; the main thread rebuilds and checksums them.
//
// cargo run --example frame_pipeline -- <num_frames> [width height]
use dmxp_framepool::Pipeline::StageThread;
use dmxp_framepool::{
    DropPayload, Frame, FrameCodec, MessageWrapper, NetAddr, PoolBuilder, PoolRegistry, Routed,
};
use sha2::{Digest, Sha256};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

const CAPTURE_ADDR: NetAddr = NetAddr::new(10);
const VIEWER_ADDR: NetAddr = NetAddr::new(20);

fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <num_frames> [width height]", args[0]);
        std::process::exit(1);
    }
    let num_frames: u32 = args[1].parse()?;
    let width: u32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(640);
    let height: u32 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(480);

    let running = Arc::new(AtomicBool::new(true));
    let running_for_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_for_handler.store(false, Ordering::SeqCst);
    })?;

    let registry = Arc::new(PoolRegistry::new());
    let pool = PoolBuilder::new()
        .with_pool_size(4)
        .build_frames::<u16, u16, Routed, DropPayload>(width, height)?;
    registry.insert(Arc::new(pool));

    let (tx, rx) = mpsc::sync_channel::<(Vec<u8>, String)>(2);

    let source = Arc::clone(&registry);
    let keep_running = Arc::clone(&running);
    let codec = FrameCodec::default();
    let mut sequence = 0u32;
    let mut capture = StageThread::spawn("capture", move || {
        if !keep_running.load(Ordering::SeqCst) || sequence == num_frames {
            return true;
        }
        let Some(mut handle) = source.acquire_routed::<Frame<u16>>() else {
            std::thread::sleep(Duration::from_micros(10));
            return false;
        };
        if let Some(msg) = handle.get_mut() {
            msg.set_net_points(CAPTURE_ADDR, VIEWER_ADDR);
            msg.set_sequence_id(sequence);
            let frame = msg.payload_mut();
            for (i, p) in frame.pixels_mut().iter_mut().enumerate() {
                *p = (i as u32).wrapping_add(sequence) as u16;
            }
            let stamp = sequence.to_le_bytes();
            frame.sidecar_mut().reset();
            if let Err(e) = frame.sidecar_mut().write(&[
                u16::from_le_bytes([stamp[0], stamp[1]]),
                u16::from_le_bytes([stamp[2], stamp[3]]),
            ]) {
                eprintln!("Capture: sidecar stamp failed: {}", e);
                return true;
            }
        }
        let digest = checksum(handle.payload().pixel_bytes());
        let record = match codec.encode_to_vec(&handle) {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Capture: encode failed: {}", e);
                return true;
            }
        };
        sequence += 1;
        tx.send((record, digest)).is_err()
    })?;

    let mut incoming = MessageWrapper::<Frame<u16>>::new(Frame::new(width, height)?);
    let start = Instant::now();
    let mut received = 0u32;
    let mut mismatched = 0u32;

    while let Ok((record, digest)) = rx.recv() {
        codec.decode(&mut incoming, &record)?;
        if checksum(incoming.payload().pixel_bytes()) != digest {
            mismatched += 1;
        }
        received += 1;
        if received % 100 == 0 {
            println!("Viewer: received {} frames", received);
        }
    }

    let elapsed = start.elapsed();
    capture.finish(Duration::from_secs(5));
    registry.pool_info();

    println!(
        "Viewer: {} frames ({}x{}) in {:.2?}, {} checksum mismatches",
        received, width, height, elapsed, mismatched
    );
    if elapsed.as_secs_f64() > 0.0 {
        println!(
            "Viewer: {:.0} frames/s",
            received as f64 / elapsed.as_secs_f64()
        );
    }
    Ok(())
}
