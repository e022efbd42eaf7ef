use startline::{
    parse_request_line, parse_request_line_with_config, render, Method, ParseError, Parser,
    ParserConfig, RequestLine, Target, Version,
};

// =========================================================================
// Successful parsing
// =========================================================================

#[test]
fn get_with_headers_resumes_at_headers() {
    let raw = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
    let (line, resume) = parse_request_line(raw).expect("should parse");
    assert_eq!(line.method, Method::GET);
    assert_eq!(line.target, "/");
    assert_eq!(line.version, Version::HTTP_11);
    assert_eq!(&raw[resume..], b"Host: x\r\n\r\n");
}

#[test]
fn bare_lf_resumes_at_end_of_buffer() {
    let raw = b"POST /api HTTP/1.0\n";
    let (line, resume) = parse_request_line(raw).expect("should parse");
    assert_eq!(line.method, Method::POST);
    assert_eq!(line.target, "/api");
    assert_eq!(line.version, Version::HTTP_10);
    assert_eq!(resume, raw.len());
}

#[test]
fn all_methods() {
    for method in Method::ALL {
        let raw = format!("{method} /resource HTTP/1.1\r\n");
        let (line, _) = parse_request_line(raw.as_bytes())
            .unwrap_or_else(|e| panic!("method {method}: {e}"));
        assert_eq!(line.method, method, "mismatch for method {method}");
    }
}

#[test]
fn options_asterisk_and_absolute_targets() {
    let (line, _) = parse_request_line(b"OPTIONS * HTTP/1.1\r\n").expect("should parse");
    assert_eq!(line.target, "*");

    let (line, _) = parse_request_line(b"CONNECT example.com:443 HTTP/1.1\r\n").expect("should parse");
    assert_eq!(line.target, "example.com:443");

    let raw = b"GET http://includeos.org/a?b=c#d HTTP/1.1\r\n";
    let (line, _) = parse_request_line(raw).expect("should parse");
    assert_eq!(line.target, "http://includeos.org/a?b=c#d");
}

#[test]
fn leading_whitespace_is_skipped() {
    let raw = b" \t  GET /lead HTTP/1.1\r\n";
    let (line, resume) = parse_request_line(raw).expect("should parse");
    assert_eq!(line.target, "/lead");
    assert_eq!(resume, raw.len());
}

#[test]
fn multi_digit_versions() {
    let (line, _) = parse_request_line(b"GET / HTTP/12.034\r\n").expect("should parse");
    assert_eq!(line.version, Version::new(12, 34));
    assert_eq!(render(&line), b"GET / HTTP/12.34\r\n");
}

#[test]
fn shortest_valid_line_is_accepted() {
    let raw = b"GET / HTTP/1.1\n";
    assert_eq!(raw.len(), 15);
    let (line, resume) = parse_request_line(raw).expect("should parse");
    assert_eq!(line, RequestLine::default());
    assert_eq!(resume, 15);
}

#[test]
fn non_utf8_target_is_kept_verbatim() {
    let raw = b"GET /caf\xE9 HTTP/1.1\r\n";
    let (line, _) = parse_request_line(raw).expect("should parse");
    assert_eq!(line.target.as_bytes(), b"/caf\xE9");
    assert_eq!(render(&line), raw);
}

// =========================================================================
// Length guard
// =========================================================================

#[test]
fn empty_input_is_too_short() {
    assert_eq!(
        parse_request_line(b""),
        Err(ParseError::InputTooShort { len: 0, min: 15 })
    );
}

#[test]
fn short_well_shaped_input_is_too_short() {
    assert_eq!(
        parse_request_line(b"GET /\r\n"),
        Err(ParseError::InputTooShort { len: 7, min: 15 })
    );
    assert_eq!(
        parse_request_line(b"GET / \n"),
        Err(ParseError::InputTooShort { len: 7, min: 15 })
    );
}

#[test]
fn length_guard_runs_before_terminator_search() {
    // 14 bytes, no terminator at all.
    assert!(matches!(
        parse_request_line(b"GET / HTTP/1.1"),
        Err(ParseError::InputTooShort { len: 14, .. })
    ));
}

// =========================================================================
// Terminators
// =========================================================================

#[test]
fn lone_cr_is_missing_terminator() {
    assert_eq!(
        parse_request_line(b"GET / HTTP/1.1\r"),
        Err(ParseError::MissingLineTerminator)
    );
}

#[test]
fn nonsense_without_newline_is_missing_terminator() {
    let raw = b"[IncludeOS] A minimal, resource efficient unikernel for cloud services";
    assert_eq!(
        parse_request_line(raw),
        Err(ParseError::MissingLineTerminator)
    );
}

#[test]
fn crlf_is_preferred_over_earlier_bare_lf() {
    // The CRLF search spans the whole buffer, so the bare LF ends up inside
    // the line and the target cannot absorb it.
    let raw = b"GET /a\nb HTTP/1.1\r\n";
    assert!(matches!(
        parse_request_line(raw),
        Err(ParseError::GrammarMismatch(_))
    ));

    let raw = b"GET / HTTP/1.1\nHost: h\r\n";
    assert!(matches!(
        parse_request_line(raw),
        Err(ParseError::GrammarMismatch(_))
    ));
}

#[test]
fn bare_lf_before_crlf_counts_as_leading_whitespace() {
    let raw = b"\nGET / HTTP/1.1\r\n";
    let (line, resume) = parse_request_line(raw).expect("should parse");
    assert_eq!(line, RequestLine::default());
    assert_eq!(resume, raw.len());
}

#[test]
fn strict_crlf_config_rejects_bare_lf() {
    let config = ParserConfig {
        allow_bare_lf: false,
        ..ParserConfig::default()
    };
    assert_eq!(
        parse_request_line_with_config(b"POST /api HTTP/1.0\n", config.clone()),
        Err(ParseError::MissingLineTerminator)
    );
    assert!(parse_request_line_with_config(b"POST /api HTTP/1.0\r\n", config).is_ok());
}

#[test]
fn line_length_ceiling() {
    let config = ParserConfig {
        max_line_len: 10,
        ..ParserConfig::default()
    };
    assert_eq!(
        parse_request_line_with_config(b"GET /abcdef HTTP/1.1\r\n", config),
        Err(ParseError::LineTooLong { len: 20, max: 10 })
    );
}

// =========================================================================
// Grammar
// =========================================================================

fn assert_mismatch(raw: &[u8]) {
    assert!(
        matches!(parse_request_line(raw), Err(ParseError::GrammarMismatch(_))),
        "expected grammar mismatch for {:?}",
        String::from_utf8_lossy(raw)
    );
}

#[test]
fn separators_must_be_single_spaces() {
    assert_mismatch(b"GET  / HTTP/1.1\r\n");
    assert_mismatch(b"GET /  HTTP/1.1\r\n");
    assert_mismatch(b"GET\t/ HTTP/1.1\r\n");
    assert_mismatch(b"GET /\tHTTP/1.1\r\n");
}

#[test]
fn missing_version_is_mismatch() {
    assert_mismatch(b"GET /index.html \r\n");
    assert_mismatch(b"GET /index.html\r\n");
}

#[test]
fn malformed_protocol_literal_is_mismatch() {
    assert_mismatch(b"GET / http/1.1\r\n");
    assert_mismatch(b"GET / HTTX/1.1\r\n");
    assert_mismatch(b"GET / HTTP/1-1\r\n");
    assert_mismatch(b"GET / HTTP/11\r\n\r\n");
}

#[test]
fn trailing_bytes_are_mismatch() {
    assert_mismatch(b"GET / HTTP/1.1 \r\n");
    assert_mismatch(b"GET / HTTP/1.1 extra\r\n");
    assert_mismatch(b"GET / HTTP/1.1x\r\n");
}

#[test]
fn blank_line_is_mismatch() {
    assert_mismatch(b"               \r\n");
}

// =========================================================================
// Field decoding
// =========================================================================

#[test]
fn unknown_method() {
    assert_eq!(
        parse_request_line(b"FOO / HTTP/1.1\r\n"),
        Err(ParseError::UnknownMethod("FOO".into()))
    );
    assert_eq!(
        parse_request_line(b"PATCH / HTTP/1.1\r\n"),
        Err(ParseError::UnknownMethod("PATCH".into()))
    );
}

#[test]
fn method_is_not_normalised() {
    assert_eq!(
        parse_request_line(b"get / HTTP/1.1\r\n"),
        Err(ParseError::UnknownMethod("get".into()))
    );
    assert_eq!(
        parse_request_line(b"Post / HTTP/1.1\r\n"),
        Err(ParseError::UnknownMethod("Post".into()))
    );
}

#[test]
fn empty_version_runs() {
    assert_eq!(
        parse_request_line(b"GET / HTTP/1.\r\n"),
        Err(ParseError::InvalidVersionNumber(String::new()))
    );
    assert_eq!(
        parse_request_line(b"GET / HTTP/.1\r\n"),
        Err(ParseError::InvalidVersionNumber(String::new()))
    );
}

#[test]
fn overflowing_version() {
    assert_eq!(
        parse_request_line(b"GET / HTTP/99999999999.1\r\n"),
        Err(ParseError::InvalidVersionNumber("99999999999".into()))
    );
}

// =========================================================================
// Round trips
// =========================================================================

#[test]
fn crlf_source_round_trips_exactly() {
    let inputs: [&[u8]; 4] = [
        b"GET / HTTP/1.1\r\n",
        b"DELETE /users/42 HTTP/1.0\r\n",
        b"OPTIONS * HTTP/2.0\r\n",
        b"TRACE /a/b?c=%20 HTTP/1.1\r\n",
    ];
    for raw in inputs {
        let (line, resume) = parse_request_line(raw).expect("should parse");
        assert_eq!(resume, raw.len());
        assert_eq!(render(&line), raw);
    }
}

#[test]
fn lf_source_renders_with_crlf() {
    let raw = b"HEAD /health HTTP/1.1\n";
    let (line, _) = parse_request_line(raw).expect("should parse");
    let rendered = render(&line);
    assert_eq!(rendered, b"HEAD /health HTTP/1.1\r\n");
    assert_eq!(&rendered[..rendered.len() - 2], &raw[..raw.len() - 1]);
}

#[test]
fn rendered_lines_parse_back() {
    let lines = [
        RequestLine::default(),
        RequestLine::new(Method::PUT, Target::new("/upload").unwrap(), Version::HTTP_10),
        RequestLine::new(
            Method::CONNECT,
            Target::new("proxy.local:8080").unwrap(),
            Version::new(3, 7),
        ),
    ];
    for expected in lines {
        let bytes = expected.to_bytes();
        let (line, resume) = RequestLine::parse(&bytes).expect("rendered line should parse");
        assert_eq!(line, expected);
        assert_eq!(resume, bytes.len());
    }
}

// =========================================================================
// Ownership & sharing
// =========================================================================

#[test]
fn parsed_line_outlives_input_buffer() {
    let mut buffer = b"GET /owned HTTP/1.1\r\n".to_vec();
    let (line, _) = parse_request_line(&buffer).expect("should parse");
    buffer.clear();
    buffer.extend_from_slice(b"garbage");
    assert_eq!(line.target, "/owned");
}

#[test]
fn fields_are_independently_replaceable() {
    let mut line = RequestLine::default();
    line.method = Method::POST;
    assert_eq!(line.method, Method::POST);

    line.target = Target::new("http://includeos.org").unwrap();
    line.version = Version::new(2, 0);
    assert_eq!(render(&line), b"POST http://includeos.org HTTP/2.0\r\n");
}

#[test]
fn route_key_exposes_method_and_target() {
    let (line, _) = parse_request_line(b"DELETE /users/7 HTTP/1.1\r\n").expect("should parse");
    let (method, target) = line.route_key();
    assert_eq!(method, Method::DELETE);
    assert_eq!(target, "/users/7");
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = Parser::new();
    std::thread::scope(|s| {
        let handles: Vec<_> = Method::ALL
            .into_iter()
            .map(|method| {
                let parser = &parser;
                s.spawn(move || {
                    let raw = format!("{method} /t HTTP/1.1\r\n");
                    parser.parse_request_line(raw.as_bytes()).map(|(line, _)| line.method)
                })
            })
            .collect();
        for (handle, method) in handles.into_iter().zip(Method::ALL) {
            assert_eq!(handle.join().unwrap(), Ok(method));
        }
    });
}
