use crate::app_state::State;
use crate::programs::EdgeGeometryBuilder;
use crate::scene::FrameEdge;

/// Sizes `program` for `edges` and writes each one at its offset.
fn fill<'a>(program: &mut dyn EdgeGeometryBuilder, edges: impl ExactSizeIterator<Item = &'a FrameEdge>) {
    program.allocate(edges.len());

    for (offset, entry) in edges.enumerate() {
        program.process(&entry.source, &entry.target, &entry.edge, entry.hidden, offset);
    }
}

impl State {
    pub fn update(&mut self) {
        let viewport = self.viewport();
        let frame = self
            .scene
            .frame(&self.camera, viewport, &self.settings, self.quality_override);

        if frame.quality != self.quality {
            log::debug!("arrowheads switch to {:?}", frame.quality);
            self.quality = frame.quality;
        }

        let programs = &mut self.programs;
        programs.arrow_head.set_quality(frame.quality);

        fill(&mut programs.clamped, frame.straight.iter());
        fill(&mut programs.curved, frame.curved.iter());
        fill(&mut programs.self_loop, frame.self_loops.iter());
        let arrows: Vec<_> = frame.arrow_edges().collect();
        fill(&mut programs.arrow_head, arrows.into_iter());
        fill(&mut programs.self_arrow_head, frame.self_loops.iter());

        for program in programs.all_mut() {
            program.buffer_data(&self.gpu.device);
        }

        self.update_labels();
    }

    #[cfg(target_arch = "wasm32")]
    fn update_labels(&mut self) {
        let viewport = self.viewport();
        let Some(canvas) = self.label_surface.as_mut() else {
            return;
        };

        canvas.clear(viewport.0, viewport.1);
        let measure = canvas.clone();
        self.labels = self
            .scene
            .draw_labels(canvas, &measure, &self.camera, viewport, &self.settings);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn update_labels(&mut self) {
        let viewport = self.viewport();
        let Some(measure) = self.label_surface.as_ref() else {
            return;
        };

        // No 2D surface natively: lay labels out for hit testing only.
        let mut canvas = crate::labels::DrawList::default();
        self.labels = self
            .scene
            .draw_labels(&mut canvas, measure, &self.camera, viewport, &self.settings);
    }
}
