use mottrack::{BBox, Detection, Tracker, TrackerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut tracker = Tracker::new(TrackerConfig::default());

    println!("Tracking two synthetic objects over 25 frames...");

    for frame in 0..25 {
        // one car driving right, one pedestrian walking left;
        // the pedestrian is occluded for frames 12..=16
        let mut detections = vec![Detection::new(
            BBox::new(40 + 12 * frame, 200, 80, 60),
            0.92,
            2,
            "car",
        )];
        if !(12..=16).contains(&frame) {
            detections.push(Detection::new(
                BBox::new(600 - 8 * frame, 260, 40, 90),
                0.81,
                0,
                "person",
            ));
        }

        let confirmed = tracker.update(&detections)?;

        println!("Frame {frame:2}: {} confirmed track(s)", confirmed.len());
        for track in confirmed {
            let bbox = track.current_bbox();
            println!(
                "  #{:<2} {:<7} {}  misses={} trajectory={}",
                track.id,
                track.class_name,
                bbox,
                track.time_since_update,
                track.trajectory().len()
            );
        }
    }

    println!("\nTotal identities issued: {}", tracker.total_tracks());
    println!("Tracks still alive: {}", tracker.num_tracks());

    Ok(())
}
