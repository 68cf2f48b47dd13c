use bytes::Bytes;
use cgi_form::{percent, CgiEnv, Constraints, Error, Request, RequestDecoder, SizeLimit};

const UPLOAD_BODY: &str = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"My Field\"\r\n\r\nabcd\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

fn multipart_env(body: &'static str) -> CgiEnv {
    CgiEnv::new()
        .var("CONTENT_TYPE", "multipart/form-data; boundary=X-BOUNDARY")
        .body(body)
}

#[test]
fn test_percent_round_trip_printable_ascii() {
    let samples = ["", "plain", "John Doe", "a+b=c&d", "100% sure?", "~'()*!-_.", " \"#$/:;<>@[\\]^`{|}"];
    for s in samples.iter() {
        assert_eq!(percent::decode_str(&percent::encode(s)), *s);
    }
}

#[test]
fn test_query_string_fields() {
    let env = CgiEnv::new().var("QUERY_STRING", "name=John+Doe&age=30");
    let request = Request::from_env(&env).unwrap();

    let fields: Vec<_> = request.fields().iter().map(|f| (f.name(), f.value())).collect();
    assert_eq!(fields, vec![("name", "John Doe"), ("age", "30")]);
    assert_eq!(request.fields().get("name").unwrap().value(), "John Doe");
    assert_eq!(request.fields().get("age").unwrap().value(), "30");
}

#[test]
fn test_multipart_basic() {
    let request = Request::from_env(&multipart_env(UPLOAD_BODY)).unwrap();

    assert_eq!(request.fields().len(), 1);
    let field = request.fields().get("My Field").unwrap();
    assert_eq!(field.value(), "abcd");

    assert_eq!(request.files().len(), 1);
    let file = request.files().get("File Field").unwrap();
    assert_eq!(file.file_name(), "a-text-file.txt");
    assert_eq!(file.content_type(), "text/plain");
    assert_eq!(file.as_bytes(), b"Hello world\nHello\r\nWorld\rAgain");
}

#[test]
fn test_multipart_single_file() {
    let body = "--X\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\nContent-Type: text/plain\r\n\r\nhello\r\n--X--\r\n";
    let env = CgiEnv::new()
        .var("CONTENT_TYPE", "multipart/form-data; boundary=X")
        .body(body);
    let request = Request::from_env(&env).unwrap();

    assert!(request.fields().is_empty());
    let file = request.files().get("f").unwrap();
    assert_eq!(file.name(), "f");
    assert_eq!(file.file_name(), "a.txt");
    assert_eq!(file.content_type(), "text/plain");
    assert_eq!(file.data(), Bytes::from_static(b"hello"));
}

#[test]
fn test_multipart_without_closing_boundary() {
    let body = "--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--X\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\n2\r\n--X\r\n";
    let env = CgiEnv::new()
        .var("CONTENT_TYPE", "multipart/form-data; boundary=X")
        .body(body);
    let request = Request::from_env(&env).unwrap();

    let fields: Vec<_> = request.fields().iter().map(|f| (f.name(), f.value())).collect();
    assert_eq!(fields, vec![("a", "1"), ("b", "2")]);
}

#[test]
fn test_multipart_malformed_part_fails_the_decode() {
    let body = "--X\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--X\r\nContent-Disposition: form-data; name=\"b\"\r\n--X--\r\n";
    let env = CgiEnv::new()
        .var("QUERY_STRING", "q=1")
        .var("CONTENT_TYPE", "multipart/form-data; boundary=X")
        .body(body);

    assert_eq!(Request::from_env(&env).unwrap_err(), Error::MalformedPart { index: 1 });
}

#[test]
fn test_multipart_without_boundary_fails_the_decode() {
    let env = CgiEnv::new()
        .var("CONTENT_TYPE", "multipart/form-data")
        .body("--X\r\n");
    let err = Request::from_env(&env).unwrap_err();
    assert!(matches!(err, Error::MalformedContentType { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_urlencoded_body_joins_query_fields() {
    let env = CgiEnv::new()
        .var("QUERY_STRING", "page=2")
        .var("CONTENT_TYPE", "application/x-www-form-urlencoded; charset=UTF-8")
        .body("comment=line1%0D%0Aline2&page=3");
    let request = Request::from_env(&env).unwrap();

    let pages: Vec<_> = request.fields().get_all("page").unwrap().iter().map(|f| f.value()).collect();
    assert_eq!(pages, vec!["2", "3"]);
    assert!(matches!(request.fields().get("page"), Err(Error::IsList { count: 2, .. })));

    let comment = request.fields().get("comment").unwrap();
    assert_eq!(comment.value(), "line1\r\nline2");
    assert_eq!(comment.value_normalized(), "line1\nline2");
    assert_eq!(comment.value_stripped(), "line1line2");
}

#[test]
fn test_body_without_content_type_is_urlencoded() {
    let env = CgiEnv::new().body("a=1");
    let request = Request::from_env(&env).unwrap();
    assert_eq!(request.fields().get("a").unwrap().value(), "1");
}

#[test]
fn test_unsupported_body_keeps_query_string() {
    let env = CgiEnv::new()
        .var("QUERY_STRING", "id=9")
        .var("CONTENT_TYPE", "application/json")
        .body("{\"id\": 10}");
    let request = Request::from_env(&env).unwrap();

    assert_eq!(request.fields().get("id").unwrap().value(), "9");
    assert!(matches!(request.body_error(), Some(Error::UnsupportedContentType { .. })));
}

#[test]
fn test_cookies() {
    let env = CgiEnv::new().var("HTTP_COOKIE", "a=1; b=2;c=3");
    let request = Request::from_env(&env).unwrap();

    let cookies: Vec<_> = request.cookies().iter().map(|c| (c.name(), c.value())).collect();
    assert_eq!(cookies, vec![("a", "1"), ("b", "2"), ("c", "3")]);
}

#[test]
fn test_file_payload_outlives_request() {
    let payload = {
        let request = Request::from_env(&multipart_env(UPLOAD_BODY)).unwrap();
        request.files().get("File Field").unwrap().data()
    };
    assert_eq!(&payload[..5], b"Hello");
}

#[test]
fn test_constraints_apply_to_body_only() {
    let decoder = RequestDecoder::with_constraints(
        Constraints::new()
            .allowed_fields(vec!["My Field", "File Field"])
            .size_limit(SizeLimit::new().per_field(4).for_field("File Field", 64)),
    );

    let env = multipart_env(UPLOAD_BODY).var("QUERY_STRING", "unlisted=a+long+value");
    let request = decoder.decode_env(&env).unwrap();
    assert_eq!(request.fields().len(), 2);
    assert_eq!(request.files().len(), 1);

    let decoder = RequestDecoder::with_constraints(
        Constraints::new().size_limit(SizeLimit::new().per_field(4)),
    );
    assert_eq!(
        decoder.decode_env(&multipart_env(UPLOAD_BODY)).unwrap_err(),
        Error::FieldSizeExceeded {
            limit: 4,
            field_name: Some("File Field".to_owned())
        }
    );
}

#[test]
fn test_from_http_request() {
    let req = http::Request::builder()
        .method("POST")
        .uri("/upload?album=7")
        .header("Content-Type", "multipart/form-data; boundary=X-BOUNDARY")
        .header("Cookie", "sid=42")
        .body(Bytes::from_static(UPLOAD_BODY.as_bytes()))
        .unwrap();

    let request = Request::from_env(&CgiEnv::from_http_request(&req)).unwrap();
    assert_eq!(request.fields().get("album").unwrap().value(), "7");
    assert_eq!(request.fields().get("My Field").unwrap().value(), "abcd");
    assert_eq!(request.files().len(), 1);
    assert_eq!(request.cookies().get("sid").unwrap().value(), "42");
}

#[cfg(feature = "tokio-io")]
#[tokio::test]
async fn test_from_async_read() {
    let vars = vec![
        ("CONTENT_TYPE".to_owned(), "multipart/form-data; boundary=X-BOUNDARY".to_owned()),
        ("CONTENT_LENGTH".to_owned(), UPLOAD_BODY.len().to_string()),
    ];
    let env = CgiEnv::from_async_read(vars, UPLOAD_BODY.as_bytes()).await.unwrap();
    let request = Request::from_env(&env).unwrap();
    assert_eq!(request.files().len(), 1);
}
