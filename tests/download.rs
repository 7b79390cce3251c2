use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use assert_matches::assert_matches;

use caldb_sync::catalog::{CatalogClient, HttpCatalogClient};
use caldb_sync::error::CaldbError;

fn spawn_server<F>(handler: F) -> SocketAddr
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            handler(stream);
        }
    });
    addr
}

fn drain_request(stream: &mut TcpStream) {
    let mut buf = [0u8; 1024];
    let _ = stream.read(&mut buf);
}

// Real goodfiles bundles take well over any default HTTP client timeout to
// transfer; a stall longer than 30 s must not abort the download.
#[test]
fn download_outlasts_a_stalled_body() {
    let head = b"goodfiles head ";
    let tail = b"goodfiles tail";
    let addr = spawn_server(move |mut stream| {
        drain_request(&mut stream);
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            head.len() + tail.len()
        )
        .unwrap();
        stream.write_all(head).unwrap();
        stream.flush().unwrap();
        thread::sleep(Duration::from_secs(35));
        stream.write_all(tail).unwrap();
    });

    let temp = tempfile::tempdir().unwrap();
    let destination = temp.path().join("goodfiles_nustar_fpm.tar.gz");
    let client = HttpCatalogClient::new().unwrap();
    client
        .download(
            &format!("http://{addr}/data/nustar/fpm/goodfiles_nustar_fpm.tar.gz"),
            &destination,
        )
        .unwrap();

    assert_eq!(
        std::fs::read(&destination).unwrap(),
        b"goodfiles head goodfiles tail"
    );
}

#[test]
fn interrupted_body_is_a_download_error() {
    let addr = spawn_server(|mut stream| {
        drain_request(&mut stream);
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n"
        )
        .unwrap();
        stream.write_all(b"partial").unwrap();
        // Dropping the stream here cuts the body short of Content-Length.
    });

    let temp = tempfile::tempdir().unwrap();
    let destination = temp.path().join("goodfiles_swift_xrt.tar.gz");
    let client = HttpCatalogClient::new().unwrap();
    let err = client
        .download(
            &format!("http://{addr}/data/swift/xrt/goodfiles_swift_xrt.tar.gz"),
            &destination,
        )
        .unwrap_err();

    assert_matches!(err, CaldbError::DownloadHttp(_));
}
