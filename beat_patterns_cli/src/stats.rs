use beatmap_schema::BeatmapData;

pub fn print_stats(chart: &BeatmapData, song_length: f64, bpm: u32) {
    let stats = chart.stats(song_length, bpm);

    println!("Notes:            {}", stats.note_count);
    println!("Notes per second: {:.2}", stats.notes_per_second);
    println!("Largest gap:      {:.2}", stats.largest_gap);
    println!("Large gaps:       {}", stats.large_gaps);
    println!("Red cuts:         {}", stats.red_cuts);
    println!("Blue cuts:        {}", stats.blue_cuts);
    println!("Up/down cuts:     {}", stats.up_down_cuts);
    println!("Left/right cuts:  {}", stats.left_right_cuts);
    println!("Diagonal cuts:    {}", stats.diagonal_cuts);
}
