// Frames over a loopback UDP socket pair, one wire record per datagram.
//
// cargo run --example udp_loopback -- [num_frames]
use dmxp_framepool::{
    DropPayload, Frame, FrameCodec, MessageWrapper, NetAddr, PoolBuilder, Routed,
};
use std::env;
use std::net::UdpSocket;
use std::time::Duration;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let num_frames: u32 = env::args().nth(1).map(|s| s.parse()).transpose()?.unwrap_or(10);

    let receiver = UdpSocket::bind("127.0.0.1:0")?;
    receiver.set_read_timeout(Some(Duration::from_secs(1)))?;
    let sender = UdpSocket::bind("127.0.0.1:0")?;
    sender.connect(receiver.local_addr()?)?;
    println!("UDP: {} -> {}", sender.local_addr()?, receiver.local_addr()?);

    let pool = PoolBuilder::new()
        .with_pool_size(2)
        .build_frames::<u8, u16, Routed, DropPayload>(WIDTH, HEIGHT)?;
    let codec = FrameCodec::default();

    let mut wire = vec![0u8; FrameCodec::encoded_len(&Frame::<u8>::new(WIDTH, HEIGHT)?)];
    let mut datagram = vec![0u8; 65_536];
    let mut incoming = MessageWrapper::<Frame<u8>>::new(Frame::new(WIDTH, HEIGHT)?);

    for i in 0..num_frames {
        let Some(mut handle) = pool.try_acquire() else {
            eprintln!("UDP: pool exhausted at frame {}", i);
            break;
        };
        if let Some(msg) = handle.get_mut() {
            msg.set_net_points(NetAddr::new(1), NetAddr::new(2));
            msg.set_sequence_id(i);
            msg.payload_mut().fill(i as u8);
            msg.payload_mut().sidecar_mut().reset();
            msg.payload_mut().sidecar_mut().push(i as u16)?;
        }

        let len = codec.encode(&handle, &mut wire)?;
        sender.send(&wire[..len])?;
        drop(handle);

        let n = receiver.recv(&mut datagram)?;
        let header = FrameCodec::peek_header(&datagram[..n])?;
        codec.decode(&mut incoming, &datagram[..n])?;

        println!(
            "UDP: frame {} from {} to {} ({} bytes, shape {}, sidecar {:?})",
            incoming.sequence_id(),
            header.net_src(),
            header.net_dst(),
            n,
            header.shape(),
            incoming.payload().sidecar().as_slice()
        );
    }
    Ok(())
}
