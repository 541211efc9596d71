// End-to-end protocol tests against a live server on 127.0.0.1

use crate::config::Config;
use crate::core_auth::core_auth::PasswdEntry;
use crate::core_auth::PasswdValidator;
use crate::core_network::network::serve;
use crate::core_network::port::parse_host_port;
use crate::core_storage::LocalFilesystem;
use crate::server::ServerContext;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

struct TestServer {
    addr: SocketAddr,
    sandbox: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let sandbox = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.base_sandbox = sandbox.path().to_string_lossy().into_owned();
        config.server.data_timeout_secs = 5;
        config.server.upload_buffer_size = 4096;
        config.server.download_buffer_size = 4096;

        let hashed = bcrypt::hash("secret", 4).unwrap();
        let validator = PasswdValidator::from_entries([PasswdEntry::new("bob", &hashed)]);
        let context = Arc::new(ServerContext::new(
            config,
            Arc::new(LocalFilesystem::new()),
            Arc::new(validator),
        ));

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, context));
        Self { addr, sandbox }
    }

    fn home(&self) -> PathBuf {
        self.sandbox.path().join("bob")
    }

    async fn connect(&self) -> Client {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        let (read, write) = stream.into_split();
        let mut client = Client {
            reader: BufReader::new(read),
            writer: write,
        };
        assert!(client.reply().await.starts_with("220 "));
        client
    }

    async fn logged_in(&self) -> Client {
        let mut client = self.connect().await;
        assert_eq!(client.cmd("USER bob").await, "331 Password required for bob");
        assert_eq!(client.cmd("PASS secret").await, "230 Logged on");
        client
    }
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    /// Reads one complete reply; multi-line replies are joined with '\n'.
    async fn reply(&mut self) -> String {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line).await.unwrap();
            assert!(n > 0, "control connection closed while waiting for a reply");
            let line = line.trim_end_matches(['\r', '\n']).to_string();
            let done = line.len() >= 4
                && line.as_bytes()[..3].iter().all(u8::is_ascii_digit)
                && line.as_bytes()[3] == b' ';
            lines.push(line);
            if done {
                return lines.join("\n");
            }
        }
    }

    async fn cmd(&mut self, line: &str) -> String {
        self.send(line).await;
        self.reply().await
    }

    async fn is_closed(&mut self) -> bool {
        let mut line = String::new();
        matches!(self.reader.read_line(&mut line).await, Ok(0) | Err(_))
    }

    /// Issues PASV and returns the advertised endpoint.
    async fn pasv_addr(&mut self) -> SocketAddrV4 {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        let start = reply.find('(').unwrap() + 1;
        let end = reply.find(')').unwrap();
        parse_host_port(&reply[start..end]).unwrap()
    }

    /// Issues PASV and connects to the advertised endpoint.
    async fn pasv(&mut self) -> TcpStream {
        let addr = self.pasv_addr().await;
        TcpStream::connect(addr).await.unwrap()
    }

    async fn store(&mut self, name: &str, payload: &[u8]) {
        let mut data = self.pasv().await;
        assert_eq!(self.cmd(&format!("STOR {}", name)).await, "150 Ok to send data");
        data.write_all(payload).await.unwrap();
        data.shutdown().await.unwrap();
        assert_eq!(self.reply().await, "226 Transfer complete");
    }

    async fn retrieve(&mut self, name: &str) -> (String, Vec<u8>) {
        let mut data = self.pasv().await;
        let mark = self.cmd(&format!("RETR {}", name)).await;
        let mut content = Vec::new();
        data.read_to_end(&mut content).await.unwrap();
        assert_eq!(self.reply().await, "226 Closing data connection");
        (mark, content)
    }

    async fn listing(&mut self, line: &str) -> String {
        let mut data = self.pasv().await;
        assert_eq!(self.cmd(line).await, "150 Here comes the directory listing");
        let mut content = String::new();
        data.read_to_string(&mut content).await.unwrap();
        assert_eq!(self.reply().await, "226 Transfer OK");
        content
    }
}

#[tokio::test]
async fn store_then_retrieve_in_subdirectory() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory");
    assert_eq!(client.cmd("MKD sub").await, "257 \"sub\" directory created");
    assert_eq!(
        client.cmd("CWD sub").await,
        "250 CWD successful. \"/sub\" is current directory"
    );

    client.store("file.txt", b"hello").await;
    assert_eq!(
        std::fs::read(server.home().join("sub/file.txt")).unwrap(),
        b"hello"
    );

    let (mark, content) = client.retrieve("file.txt").await;
    assert_eq!(mark, "150 Opening ASCII mode data connection");
    assert_eq!(content, b"hello");
}

#[tokio::test]
async fn binary_payload_round_trips_unchanged() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    let payload: Vec<u8> = (0..20_000u32).map(|i| (i * 31 % 256) as u8).collect();

    assert_eq!(client.cmd("TYPE I").await, "200 Type set to I");
    client.store("blob.bin", &payload).await;
    let (mark, content) = client.retrieve("blob.bin").await;
    assert_eq!(mark, "150 Opening BINARY mode data connection");
    assert_eq!(content, payload);

    assert_eq!(client.cmd("TYPE A").await, "200 Type set to A");
    let (_, content) = client.retrieve("blob.bin").await;
    assert_eq!(content, payload);
    assert_eq!(client.cmd("SIZE blob.bin").await, "213 20000");
}

#[tokio::test]
async fn list_empty_directory_sends_no_lines() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    assert_eq!(client.listing("LIST").await, "");
}

#[tokio::test]
async fn list_and_nlst_show_entries() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    std::fs::write(server.home().join("hello.txt"), b"hello").unwrap();
    std::fs::write(server.home().join("notes.md"), b"# notes").unwrap();
    std::fs::create_dir(server.home().join("docs")).unwrap();

    let listing = client.listing("LIST -la").await;
    let lines: Vec<&str> = listing.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with('d') && lines[0].ends_with(" docs"));
    assert!(lines[1].starts_with("-rw") && lines[1].ends_with(" hello.txt"));
    assert!(lines[1].contains(" 1 ftp ftp "));
    assert!(listing.ends_with("\r\n"));

    let names = client.listing("NLST").await;
    assert_eq!(names, "docs\r\nhello.txt\r\nnotes.md\r\n");

    let names = client.listing("NLST ../*.txt").await;
    assert_eq!(names, "hello.txt\r\n");
}

#[tokio::test]
async fn rename_requires_existing_source() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    assert_eq!(
        client.cmd("RNTO b.txt").await,
        "550 Rename failed, no source given (use RNFR first)"
    );
    assert_eq!(
        client.cmd("RNFR missing.txt").await,
        "350 Command failed, file does not exist"
    );
    assert!(client.cmd("RNTO b.txt").await.starts_with("550 "));

    std::fs::write(server.home().join("a.txt"), b"a").unwrap();
    assert_eq!(
        client.cmd("RNFR a.txt").await,
        "350 File exists, ready for destination name"
    );
    assert_eq!(client.cmd("RNTO b.txt").await, "250 File renamed successfully");
    assert!(!server.home().join("a.txt").exists());
    assert!(server.home().join("b.txt").exists());
}

#[tokio::test]
async fn file_and_directory_maintenance() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    std::fs::write(server.home().join("f.txt"), b"12345").unwrap();

    assert_eq!(client.cmd("SIZE f.txt").await, "213 5");
    assert_eq!(client.cmd("SIZE nope.txt").await, "450 Failed to get size of file");
    assert_eq!(client.cmd("DELE f.txt").await, "250 File deleted");
    assert!(client.cmd("DELE f.txt").await.starts_with("550 "));

    assert_eq!(client.cmd("CWD nowhere").await, "550 Folder not found.");
    assert_eq!(client.cmd("MKD d").await, "257 \"d\" directory created");
    assert!(client.cmd("MKD d").await.starts_with("550 "));
    assert_eq!(client.cmd("CWD d").await, "250 CWD successful. \"/d\" is current directory");
    assert_eq!(client.cmd("CDUP").await, "250 Directory changed to /");
    assert_eq!(client.cmd("CDUP").await, "250 Directory changed to /");
    assert_eq!(client.cmd("XPWD").await, "257 \"/\" is current directory");
    assert_eq!(client.cmd("RMD d").await, "250 \"/d\" directory removed");
    assert_eq!(client.cmd("RMD /").await, "550 Delete operation failed");
}

#[tokio::test]
async fn path_traversal_stays_in_sandbox() {
    let server = TestServer::start().await;
    std::fs::write(server.sandbox.path().join("outside.txt"), b"secret").unwrap();
    let mut client = server.logged_in().await;

    assert_eq!(client.cmd("SIZE ../outside.txt").await, "450 Failed to get size of file");
    assert_eq!(client.cmd("CWD ../..").await, "250 CWD successful. \"/\" is current directory");
    assert_eq!(client.cmd("SIZE outside.txt").await, "450 Failed to get size of file");
}

#[tokio::test]
async fn two_rejected_passwords_close_the_connection() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.cmd("USER bob").await, "331 Password required for bob");
    assert_eq!(client.cmd("PASS wrong").await, "530 Invalid password");
    assert_eq!(client.cmd("PASS again").await, "530 Invalid password");
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn unknown_user_and_password_without_user_are_rejected() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.cmd("USER alice").await, "530 Invalid username: alice");
    assert_eq!(client.cmd("PASS secret").await, "530 Invalid password");
    // One failure so far; a valid login still goes through.
    assert_eq!(client.cmd("USER bob").await, "331 Password required for bob");
    assert_eq!(client.cmd("PASS secret").await, "230 Logged on");
}

#[tokio::test]
async fn gated_commands_are_ignored_before_login() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    client.send("PWD").await;
    client.send("RETR secret.txt").await;
    client.send("PASV").await;
    assert_eq!(client.cmd("SYST").await, "215 UNIX Type: L8");
    assert_eq!(
        client.cmd("FEAT").await,
        "211-Features\n SIZE\n211 end"
    );
}

#[tokio::test]
async fn unsupported_and_unknown_verbs_reply_202() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    assert_eq!(client.cmd("NOOP").await, "202 Not supported");
    assert_eq!(client.cmd("bogus arg").await, "202 Not supported");
}

#[tokio::test]
async fn transfer_without_pasv_or_port_is_refused() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    assert_eq!(client.cmd("LIST").await, "425 Use PORT or PASV first.");
    assert_eq!(client.cmd("PORT 1,2,3").await, "501 Syntax error in parameters or arguments.");
}

#[tokio::test]
async fn second_pasv_supersedes_the_first() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    std::fs::write(server.home().join("x.txt"), b"x").unwrap();

    let first = client.pasv_addr().await;
    let (_, content) = client.retrieve("x.txt").await;
    assert_eq!(content, b"x");

    // The first listener is gone: nothing is accepted there any more.
    tokio::task::yield_now().await;
    if let Ok(mut stale) = TcpStream::connect(first).await {
        let mut buf = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(5), stale.read_to_end(&mut buf))
            .await
            .expect("a stale passive connection must be closed, not left pending");
        assert!(read.map(|n| n == 0).unwrap_or(true));
    }
}

#[tokio::test]
async fn active_mode_connects_back_to_client() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    std::fs::write(server.home().join("a.txt"), b"active").unwrap();

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    assert_eq!(
        client
            .cmd(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
            .await,
        "200 PORT command successful."
    );

    client.send("RETR a.txt").await;
    let (mut data, _) = listener.accept().await.unwrap();
    assert_eq!(client.reply().await, "150 Opening ASCII mode data connection");
    let mut content = Vec::new();
    data.read_to_end(&mut content).await.unwrap();
    assert_eq!(content, b"active");
    assert_eq!(client.reply().await, "226 Closing data connection");
}

#[tokio::test]
async fn quit_closes_control_connection() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    let _data = client.pasv().await;

    assert_eq!(client.cmd("QUIT").await, "221 Goodbye");
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn sessions_are_independent() {
    let server = TestServer::start().await;
    let mut first = server.logged_in().await;
    let mut second = server.connect().await;

    assert_eq!(first.cmd("MKD a").await, "257 \"a\" directory created");
    assert!(first.cmd("CWD a").await.starts_with("250 "));

    // The second connection is neither logged in nor in /a.
    second.send("PWD").await;
    assert_eq!(second.cmd("SYST").await, "215 UNIX Type: L8");
    assert_eq!(first.cmd("PWD").await, "257 \"/a\" is current directory");
}

#[tokio::test]
async fn nlst_in_directory_with_glob_characters() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;
    std::fs::create_dir(server.home().join("a[1]")).unwrap();
    std::fs::write(server.home().join("a[1]/mine.txt"), b"m").unwrap();
    std::fs::create_dir(server.home().join("a1")).unwrap();
    std::fs::write(server.home().join("a1/other.txt"), b"o").unwrap();

    assert_eq!(client.listing("NLST a[1]").await, "mine.txt\r\n");
    assert!(client.cmd("CWD a[1]").await.starts_with("250 "));
    assert_eq!(client.listing("NLST").await, "mine.txt\r\n");
    assert_eq!(client.listing("NLST *.txt").await, "mine.txt\r\n");
    assert!(client.listing("LIST").await.contains(" mine.txt"));
}

#[tokio::test]
async fn stor_into_missing_directory_is_refused() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    let mut data = client.pasv().await;
    assert_eq!(client.cmd("STOR nodir/x.txt").await, "553 Could not create file");
    let mut buf = Vec::new();
    let read = data.read_to_end(&mut buf).await;
    assert!(read.map(|n| n == 0).unwrap_or(true));
    assert!(!server.home().join("nodir").exists());
}

#[tokio::test]
async fn retr_of_missing_file_replies_550() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    let mut data = client.pasv().await;
    assert_eq!(client.cmd("RETR missing.txt").await, "550 File not found or not readable");
    let mut buf = Vec::new();
    let read = data.read_to_end(&mut buf).await;
    assert!(read.map(|n| n == 0).unwrap_or(true));
}

#[tokio::test]
async fn nlst_with_malformed_pattern_replies_451() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    let _data = client.pasv().await;
    assert_eq!(client.cmd("NLST [").await, "451 Read error");
    assert_eq!(client.cmd("SYST").await, "215 UNIX Type: L8");
}

#[tokio::test]
async fn list_of_missing_path_replies_550() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    let _data = client.pasv().await;
    assert_eq!(client.cmd("LIST nowhere").await, "550 Folder not found.");
}

#[tokio::test]
async fn active_mode_store() {
    let server = TestServer::start().await;
    let mut client = server.logged_in().await;

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    assert_eq!(
        client
            .cmd(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
            .await,
        "200 PORT command successful."
    );

    client.send("STOR up.txt").await;
    let (mut data, _) = listener.accept().await.unwrap();
    assert_eq!(client.reply().await, "150 Ok to send data");
    data.write_all(b"uploaded").await.unwrap();
    data.shutdown().await.unwrap();
    assert_eq!(client.reply().await, "226 Transfer complete");
    assert_eq!(std::fs::read(server.home().join("up.txt")).unwrap(), b"uploaded");
}

#[tokio::test]
async fn overlong_command_line_is_dropped() {
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    let long = format!("USER {}", "x".repeat(10_000));
    assert_eq!(client.cmd(&long).await, "500 Command line too long.");
    assert_eq!(client.cmd("SYST").await, "215 UNIX Type: L8");
}
