use std::net::{TcpListener, TcpStream};
use std::thread;

use log::{debug, info};
use wsframer::ws::{FrameCodec, FrameReceiver, FrameWriter, Role};

fn serve(mut stream: TcpStream) -> Result<(), wsframer::ws::Error> {
    let mut receiver = FrameReceiver::new(Role::NonMasking);
    let mut writer = FrameWriter::new(Role::NonMasking);
    loop {
        receiver.read_from(&mut stream)?;
        while let Some(payload) = receiver.decode_next()? {
            debug!("server received {} bytes", payload.len());
            writer.send(&mut stream, payload)?;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let server = thread::spawn(move || -> anyhow::Result<()> {
        let (stream, peer) = listener.accept()?;
        info!("accepted connection from {peer}");
        if let Err(err) = serve(stream) {
            info!("connection closed: {err}");
        }
        Ok(())
    });

    let mut stream = TcpStream::connect(addr)?;
    let mut client = FrameCodec::client();

    let messages: [&[u8]; 3] = [b"Hello, World!", &[b'x'; 50_000], b"bye"];
    for message in messages {
        client.send(&mut stream, message)?;
    }

    let mut received = 0;
    while received < messages.len() {
        client.read_from(&mut stream)?;
        while let Some(payload) = client.decode_next()? {
            info!("({}) {}", payload.len(), String::from_utf8_lossy(&payload[..payload.len().min(32)]));
            received += 1;
        }
    }

    drop(stream);
    server.join().map_err(|_| anyhow::anyhow!("server thread panicked"))??;
    Ok(())
}
