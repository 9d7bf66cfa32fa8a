#[cfg(test)]
mod analysis_proptests {

    use image::{DynamicImage, RgbImage};
    use proptest::prelude::*;

    use analysis::{enumerate_combinations, extract_payload, ChannelCombination, NullSink};
    use stegscope::*;

    fn image_strategy() -> impl Strategy<Value = RgbImage> {
        (1u32..=16, 1u32..=16).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |buf| RgbImage::from_raw(w, h, buf).expect("buffer sized to fit"))
        })
    }

    proptest! {
        #[test]
        fn proptest_payload_length_law(img in image_strategy()) {
            let config = AnalysisConfig { brute_force: true, ..AnalysisConfig::default() };
            let pixels = (img.width() * img.height()) as usize;

            for combo in enumerate_combinations(&config) {
                let payload = extract_payload(&img, &combo).unwrap();
                let bits = pixels * combo.channels.len();
                prop_assert_eq!(payload.len(), bits.div_ceil(8));
            }
        }

        #[test]
        fn proptest_reports_are_deterministic(img in image_strategy()) {
            let config = AnalysisConfig { brute_force: true, ..AnalysisConfig::default() };
            let img = DynamicImage::ImageRgb8(img);

            let mut analyzer = Analyzer::new();
            let first = analyzer.analyze(&img, &config, &mut NullSink).unwrap();
            let second = analyzer.analyze(&img, &config, &mut NullSink).unwrap();

            prop_assert_eq!(first.to_string(), second.to_string());
        }

        #[test]
        fn proptest_red_lsb_matches_reference(img in image_strategy()) {
            let combo = ChannelCombination::new(Channel::R.into(), BitPosition::Lsb);
            let payload = extract_payload(&img, &combo).unwrap();

            let pixels = (img.width() * img.height()) as usize;
            let mut expected = vec![0u8; pixels.div_ceil(8)];
            for (i, px) in img.pixels().enumerate() {
                if px.0[0] & 1 == 1 {
                    expected[i / 8] |= 0x80 >> (i % 8);
                }
            }

            prop_assert_eq!(payload, expected);
        }

        #[test]
        fn proptest_entropy_bounds(data in prop::collection::vec(any::<u8>(), 0..2048)) {
            let entropy = shannon_entropy(&data);
            prop_assert!((0.0..=8.0).contains(&entropy));
        }
    }
}

#[cfg(test)]
mod analysis_scenarios {

    use image::{DynamicImage, Rgb, RgbImage};
    use test_case::test_case;

    use analysis::{
        AnalysisEvent, BinaryKind, FormatClassification, NullSink, TextEncoding,
    };
    use stegscope::*;

    // Sets the red LSBs of a one row image to the message bits, most
    // significant bit of each byte first
    fn embed_red_lsb(message: &[u8]) -> DynamicImage {
        let bits = (message.len() * 8) as u32;
        let mut img = RgbImage::from_pixel(bits, 1, Rgb([4, 4, 4]));
        for (i, px) in img.pixels_mut().enumerate() {
            px.0[0] |= (message[i / 8] >> (7 - (i % 8))) & 1;
        }
        DynamicImage::ImageRgb8(img)
    }

    fn red_lsb_config() -> AnalysisConfig {
        AnalysisConfig { channels: Channel::R.into(), ..AnalysisConfig::default() }
    }

    fn analyze(img: &DynamicImage, config: &AnalysisConfig) -> AnalysisReport {
        Analyzer::new().analyze(img, config, &mut NullSink).unwrap()
    }

    fn png_chunk(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(tag);
        out.extend_from_slice(data);
        // Payload walks do not verify the CRC
        out.extend_from_slice(&[0; 4]);
        out
    }

    #[test_case(4, 4, "ffff"; "sixteen_bits_pack_to_two_full_bytes")]
    #[test_case(4, 3, "fff0"; "twelve_bits_pad_the_final_byte")]
    #[test_case(8, 1, "ff"; "eight_bits_fill_exactly_one_byte")]
    #[test_case(3, 1, "e0"; "three_bits_pad_five_zeros")]
    fn test_packing(width: u32, height: u32, hex: &str) {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 0, 0])));
        let config = AnalysisConfig { output_format: OutputFormat::Hex, ..red_lsb_config() };

        let report = analyze(&img, &config);
        assert!(report.sections()[0].lines.contains(&hex.to_string()));
    }

    #[test]
    fn test_brute_force_section_order() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        let config = AnalysisConfig { brute_force: true, ..AnalysisConfig::default() };

        let report = analyze(&img, &config);
        let headers: Vec<String> =
            report.sections().iter().map(|s| s.combination.to_string()).collect();

        let exp = [
            "R - LSB", "R - MSB", "G - LSB", "G - MSB", "B - LSB", "B - MSB",
            "R+G - LSB", "R+G - MSB", "R+B - LSB", "R+B - MSB", "G+B - LSB", "G+B - MSB",
            "R+G+B - LSB", "R+G+B - MSB",
        ];
        assert_eq!(headers, exp);
    }

    #[test]
    fn test_text_wins_over_zip_signature() {
        // Starts with the ZIP magic but reads as printable text
        let img = embed_red_lsb(b"PK\x03\x04 hello");
        let report = analyze(&img, &red_lsb_config());

        let section = &report.sections()[0];
        assert!(matches!(
            section.classification,
            Some(FormatClassification::Text { encoding: TextEncoding::Utf8, .. })
        ));
        assert!(section.lines.iter().any(|l| l.starts_with("Detected encoding: UTF-8")));
    }

    #[test]
    fn test_gbk_detection() {
        let img = embed_red_lsb(b"hello \xD6\xD0\xCE\xC4");
        let report = analyze(&img, &red_lsb_config());

        let section = &report.sections()[0];
        assert!(matches!(
            section.classification,
            Some(FormatClassification::Text { encoding: TextEncoding::Gbk, .. })
        ));
        assert!(section
            .lines
            .contains(&"Detected encoding: GBK (printable ratio 0.75)".to_string()));
    }

    #[test]
    fn test_jpeg_signature_detection() {
        let img = embed_red_lsb(&[0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02, 0x03, 0x04]);
        let report = analyze(&img, &red_lsb_config());

        let section = &report.sections()[0];
        assert_eq!(section.classification, Some(FormatClassification::KnownBinary(BinaryKind::Jpeg)));
        assert!(section.lines.contains(&"Detected JPEG file signature".to_string()));
        assert!(section.lines.contains(&"Hex data:".to_string()));
    }

    #[test]
    fn test_png_payload_walk_stops_at_iend() {
        let mut payload = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&9u32.to_be_bytes());
        ihdr.extend_from_slice(&7u32.to_be_bytes());
        ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
        payload.extend_from_slice(&png_chunk(b"IHDR", &ihdr));
        payload.extend_from_slice(&png_chunk(b"IEND", &[]));
        payload.extend_from_slice(&png_chunk(b"tEXt", b"after\0the end"));

        let img = embed_red_lsb(&payload);
        let report = analyze(&img, &red_lsb_config());

        let section = &report.sections()[0];
        assert_eq!(section.classification, Some(FormatClassification::KnownBinary(BinaryKind::Png)));
        assert!(section.lines.contains(&"Detected PNG file signature".to_string()));
        assert!(section.lines.contains(&"Chunk: IHDR, length: 13".to_string()));
        assert!(section
            .lines
            .contains(&"Size: 9x7, bit depth: 8, color type: 6".to_string()));
        assert!(section.lines.contains(&"Chunk: IEND, length: 0".to_string()));
        assert!(!section.lines.iter().any(|l| l.contains("tEXt")));
    }

    #[test]
    fn test_hex_truncation_in_pipeline() {
        let img = embed_red_lsb(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
        let config = AnalysisConfig {
            output_format: OutputFormat::Hex,
            max_output_bytes: 4,
            ..red_lsb_config()
        };

        let report = analyze(&img, &config);
        let section = &report.sections()[0];

        assert_eq!(section.lines[0], "Extracted data size: 10 bytes");
        assert!(section.lines.contains(&"Hex data (truncated):".to_string()));
        assert!(section.lines.contains(&"00010203".to_string()));
        assert!(section
            .lines
            .contains(&"... (truncated, showing first 4 bytes)".to_string()));
    }

    #[test]
    fn test_report_golden() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, Rgb([1, 0, 0])));
        let config = AnalysisConfig { output_format: OutputFormat::Hex, ..red_lsb_config() };

        let report = analyze(&img, &config);
        let exp = "=== Steganalysis results ===\n\n\
                   === Channel R - LSB ===\n\
                   Extracted data size: 1 bytes\n\
                   Hex data:\n\
                   c0\n\n";
        assert_eq!(report.to_string(), exp);
    }

    #[test]
    fn test_cancellation_marker_in_report() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([7, 7, 7])));
        let config = AnalysisConfig { brute_force: true, ..AnalysisConfig::default() };

        let mut analyzer = Analyzer::new();
        let cancel = analyzer.cancel_flag();
        let mut sink = |event: AnalysisEvent| {
            if let AnalysisEvent::Progress { completed: 3, .. } = event {
                cancel.cancel();
            }
        };
        let report = analyzer.analyze(&img, &config, &mut sink).unwrap();

        assert_eq!(report.outcome(), RunState::Cancelled);
        assert_eq!(report.sections().len(), 3);
        assert!(report.to_string().ends_with("=== Analysis cancelled ===\n"));
    }

    #[test]
    fn test_dump_hex_ignores_output_cap() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([1, 0, 1])));
        let config = AnalysisConfig {
            brute_force: true,
            max_output_bytes: 1,
            ..AnalysisConfig::default()
        };

        let mut out = Vec::new();
        Analyzer::new().dump_hex(&img, &config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("=== Channel ").count(), 14);
        assert!(!text.contains("truncated"));
        // R plane alone is 256 bits; the full 32 byte dump must be present
        assert!(text.contains(&"ff".repeat(32)));
    }

    #[test]
    fn test_rgba_alpha_is_dropped() {
        let mut img = image::RgbaImage::from_pixel(8, 1, image::Rgba([1, 0, 0, 0xAB]));
        for px in img.pixels_mut() {
            px.0[3] = 0xFF;
        }
        let config = AnalysisConfig { output_format: OutputFormat::Hex, ..red_lsb_config() };

        let report = analyze(&DynamicImage::ImageRgba8(img), &config);
        assert!(report.sections()[0].lines.contains(&"ff".to_string()));
    }
}
