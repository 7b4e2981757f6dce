//! Forward renderer
//!
//! One render pass, one graphics pipeline from the material's shader
//! pair, two uniform slots: the frame block (view + projection) at group
//! 0 and a dynamic-offset object block (model) at group 1. Mesh buffers
//! are created lazily on first sight and uploaded in a batched copy phase
//! recorded before the render pass; residency is tracked per mesh id so
//! later frames never re-upload.

use std::collections::HashMap;
use wgpu::util::DeviceExt;
use ember_core::asset::{Material, Mesh, MeshId};
use ember_core::SceneWorld;
use crate::context::{RenderContext, RenderError};
use crate::frame::{snapshot_world, FrameUniforms, ObjectUniforms, ResidencySet};
use crate::pipeline::RenderPipeline;

/// Dynamic-offset stride for the object uniform block
///
/// Must satisfy the device's uniform-buffer offset alignment (256 is the
/// universal default limit).
const OBJECT_STRIDE: u64 = 256;

/// Initial object-uniform capacity; the buffer grows when a frame draws more
const INITIAL_OBJECT_CAPACITY: u32 = 64;

/// GPU-resident buffers for one mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// The forward render pipeline
pub struct ForwardPipeline {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_capacity: u32,
    residency: ResidencySet,
    meshes: HashMap<MeshId, GpuMesh>,
    clear_color: wgpu::Color,
}

impl ForwardPipeline {
    /// Build the pipeline from a material's shader pair
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        material: &Material,
    ) -> Result<Self, RenderError> {
        let vertex_source = material.vertex().source_str().map_err(RenderError::Shader)?;
        let fragment_source = material
            .fragment()
            .source_str()
            .map_err(RenderError::Shader)?;

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Forward Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Forward Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Forward Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(material.label()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 12,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let (object_buffer, object_bind_group) =
            Self::create_object_buffer(device, &object_layout, INITIAL_OBJECT_CAPACITY);

        Ok(Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_capacity: INITIAL_OBJECT_CAPACITY,
            residency: ResidencySet::new(),
            meshes: HashMap::new(),
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            },
        })
    }

    /// Whether a mesh's buffers are GPU-resident
    pub fn is_resident(&self, id: MeshId) -> bool {
        self.residency.is_resident(id)
    }

    /// Number of GPU-resident meshes
    pub fn resident_mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: u32,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: OBJECT_STRIDE * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Create GPU buffers for a mesh and record its upload copies
    fn upload_mesh(&mut self, ctx: &RenderContext, encoder: &mut wgpu::CommandEncoder, mesh: &Mesh) {
        let vertex_bytes = bytemuck::cast_slice(mesh.vertices());
        let mut index_bytes: Vec<u8> = bytemuck::cast_slice(mesh.indices()).to_vec();
        // Copy sizes must be 4-byte aligned; the index count is unaffected
        while index_bytes.len() % 4 != 0 {
            index_bytes.push(0);
        }

        let vertex_staging = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Staging"),
            contents: vertex_bytes,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        let index_staging = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Staging"),
            contents: &index_bytes,
            usage: wgpu::BufferUsages::COPY_SRC,
        });

        let vertex_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Vertex Buffer"),
            size: vertex_bytes.len() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Index Buffer"),
            size: index_bytes.len() as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        encoder.copy_buffer_to_buffer(&vertex_staging, 0, &vertex_buffer, 0, vertex_bytes.len() as u64);
        encoder.copy_buffer_to_buffer(&index_staging, 0, &index_buffer, 0, index_bytes.len() as u64);

        self.meshes.insert(
            mesh.id(),
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.index_count() as u32,
            },
        );
        self.residency.mark(mesh.id());
        log::debug!(
            "uploaded mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
    }
}

impl RenderPipeline for ForwardPipeline {
    fn render(&mut self, ctx: &RenderContext, world: &SceneWorld) {
        let snapshot = snapshot_world(world);

        // Batched upload phase: all pending copies go into one transfer
        // submission ahead of the draw submission, so residency holds even
        // when the frame itself is skipped
        let pending = self.residency.pending(&snapshot);
        if !pending.is_empty() {
            let mut transfer = ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Mesh Transfer Encoder"),
                });
            for mesh in &pending {
                self.upload_mesh(ctx, &mut transfer, mesh);
            }
            ctx.queue.submit(std::iter::once(transfer.finish()));
        }

        // A transiently unavailable swapchain skips the frame entirely
        let output = match ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                log::trace!("swapchain unavailable, skipping frame: {:?}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Grow the object uniform buffer before writing this frame's blocks
        let draw_count = snapshot.draws.len() as u32;
        if draw_count > self.object_capacity {
            let mut capacity = self.object_capacity.max(1);
            while capacity < draw_count {
                capacity *= 2;
            }
            let (buffer, bind_group) =
                Self::create_object_buffer(&ctx.device, &self.object_layout, capacity);
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            self.object_capacity = capacity;
        }

        ctx.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms {
                view: snapshot.view,
                proj: snapshot.proj,
            }),
        );
        for (i, draw) in snapshot.draws.iter().enumerate() {
            ctx.queue.write_buffer(
                &self.object_buffer,
                i as u64 * OBJECT_STRIDE,
                bytemuck::bytes_of(&ObjectUniforms { model: draw.model }),
            );
        }

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for (i, draw) in snapshot.draws.iter().enumerate() {
                let Some(gpu) = self.meshes.get(&draw.mesh.id()) else {
                    continue;
                };
                // The object block for draw N is bound before draw N's call
                // and cannot leak into draw N+1 (distinct dynamic offsets)
                pass.set_bind_group(1, &self.object_bind_group, &[i as u32 * OBJECT_STRIDE as u32]);
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
