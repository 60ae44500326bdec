//! End-to-end API tests over synthetic imagery.

use approx::assert_relative_eq;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;

use nailgauge::{
    measure_nails, CardDetector, DetectConfig, DetectError, Digit, FingertipSet, NailConfig, Point,
    Rect,
};

fn filled_rect(img: &mut GrayImage, x: i32, y: i32, w: u32, h: u32, pix: u8) {
    draw_filled_rect_mut(img, PixelRect::at(x, y).of_size(w, h), Luma([pix]));
}

/// 640x480 frame with a card-proportioned bright rectangle, 428 px wide.
fn card_frame() -> GrayImage {
    let mut img = GrayImage::from_pixel(640, 480, Luma([40]));
    filled_rect(&mut img, 100, 100, 428, 270, 210);
    img
}

/// Skin-toned frame with a 75 px bright nail band under the index tip.
/// All other fingertips sit in flat skin and must fail explicitly.
fn hand_frame_and_landmarks() -> (GrayImage, Vec<Point>) {
    let mut img = GrayImage::from_pixel(400, 400, Luma([120]));
    filled_rect(&mut img, 163, 130, 75, 40, 230);
    let mut landmarks = vec![Point::new(30.0, 350.0); 21];
    landmarks[8] = Point::new(200.0, 150.0); // index tip on the band
    landmarks[5] = Point::new(200.0, 250.0); // index base joint in skin
    (img, landmarks)
}

#[test]
fn card_detection_matches_known_geometry() {
    let mut detector = CardDetector::new(DetectConfig::default());
    let detection = detector.detect(&card_frame(), None).expect("card found");

    assert!(
        (detection.candidate.width_px - 428.0).abs() < 6.0,
        "width {} px",
        detection.candidate.width_px
    );
    assert!(detection.candidate.aspect_error < DetectConfig::default().card.aspect_tolerance);
    assert_relative_eq!(detection.calibration.px_per_mm, 5.0, epsilon = 0.1);
    assert!(detection.diagnostics.n_contours >= 1);
}

#[test]
fn guide_region_accepts_a_matching_card() {
    let mut detector = CardDetector::new(DetectConfig::default());
    let guide = Rect::new(80.0, 80.0, 470.0, 310.0);
    let detection = detector
        .detect(&card_frame(), Some(guide))
        .expect("card inside guide");
    assert!(detection.candidate.guide_fit.expect("guide fit") > 0.5);
}

#[test]
fn scale_is_linear_in_card_pixel_width() {
    // Same card drawn at half size: px/mm halves proportionally.
    let mut small = GrayImage::from_pixel(640, 480, Luma([40]));
    filled_rect(&mut small, 100, 100, 214, 135, 210);

    let mut detector = CardDetector::new(DetectConfig::default());
    let full = detector.detect(&card_frame(), None).expect("full card");
    detector.reset();
    let half = detector.detect(&small, None).expect("half card");

    assert_relative_eq!(
        full.calibration.px_per_mm,
        2.0 * half.calibration.px_per_mm,
        epsilon = 0.1
    );
}

#[test]
fn lock_roi_and_automatic_unlock() {
    let mut detector = CardDetector::new(DetectConfig::default());
    let img = card_frame();
    for _ in 0..3 {
        detector.detect(&img, None).expect("card");
    }
    assert!(detector.accept());

    let locked = detector.detect(&img, None).expect("card in roi");
    assert!(locked.diagnostics.roi_search);
    assert!(locked.stable);

    // Card disappears: the locked call fails and the session unlocks.
    let blank = GrayImage::from_pixel(640, 480, Luma([40]));
    assert!(detector.detect(&blank, None).is_err());
    assert!(!detector.is_locked());

    // Next call searches the full frame again.
    let recovered = detector.detect(&img, None).expect("card again");
    assert!(!recovered.diagnostics.roi_search);
}

#[test]
fn end_to_end_nail_measurement() {
    // Reference scenario: 85.6 mm card at 428 px => 5 px/mm; a 75 px
    // nail band => 15.0 mm chord, 15.9 mm curved (x1.06), size covering
    // 15..16 mm.
    let mut detector = CardDetector::new(DetectConfig::default());
    let detection = detector.detect(&card_frame(), None).expect("card");

    let (hand, landmarks) = hand_frame_and_landmarks();
    let fingertips = FingertipSet::from_landmarks(&landmarks).expect("21 landmarks");
    let results = measure_nails(
        &hand,
        &fingertips,
        &detection.calibration,
        &NailConfig::default(),
    );
    assert_eq!(results.len(), 5);

    let index = results[1].as_ref().expect("index nail measured");
    assert_eq!(index.digit, Digit::Index);
    assert_eq!(index.width_px, 75);
    assert_relative_eq!(index.chord_mm, 15.0, epsilon = 0.3);
    assert_relative_eq!(index.curved_mm, 15.9, epsilon = 0.3);
    assert_eq!(index.size, 2);
    assert!(index.confidence > 0.8);

    // Digits over flat skin fail explicitly instead of guessing.
    for (i, result) in results.iter().enumerate() {
        if i == 1 {
            continue;
        }
        assert!(
            matches!(
                result,
                Err(DetectError::BoundaryDetectionFailed { .. })
            ),
            "digit {i} should fail on flat skin"
        );
    }
}

#[test]
fn landmark_contract_is_enforced() {
    let short = vec![Point::new(0.0, 0.0); 10];
    assert!(matches!(
        FingertipSet::from_landmarks(&short),
        Err(DetectError::InvalidLandmarks {
            expected: 21,
            got: 10
        })
    ));
}
